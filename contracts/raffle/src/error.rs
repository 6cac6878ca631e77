use cosmwasm_std::{OverflowError, StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("not enough value sent: got {sent}, entrance fee is {required}")]
    InsufficientPayment { sent: Uint128, required: Uint128 },

    #[error("only {expected} is accepted, got {denom}")]
    InvalidFunds { expected: String, denom: String },

    #[error("this message does not accept funds")]
    NonPayable,

    #[error("raffle is not open")]
    RoundNotOpen,

    #[error("upkeep not needed: balance {balance}, players {num_players}, state {raffle_state}")]
    UpkeepNotNeeded {
        balance: Uint128,
        num_players: u32,
        raffle_state: String,
    },

    #[error("a settlement is already in flight for this round")]
    RoundAlreadySettling,

    #[error("unknown randomness request {request_id}")]
    UnknownRequest { request_id: u64 },

    #[error("fulfillment carried no random words")]
    NoRandomWords,

    #[error("payout of {amount} to {winner} cannot be delivered")]
    PayoutTransferFailed { winner: String, amount: Uint128 },

    #[error("coordinator response did not report a request id")]
    MissingRequestId,

    #[error("reply does not match a pending settlement")]
    UnexpectedReply,

    #[error("unknown reply id {id}")]
    UnknownReplyId { id: u64 },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    #[error("invalid hex: {field}")]
    InvalidHex { field: String },

    #[error("settlement recovery is disabled")]
    RecoveryDisabled,

    #[error("no settlement in flight to recover")]
    RecoveryNotAvailable,

    #[error("settlement has not expired yet (deadline: {deadline})")]
    SettlementNotExpired { deadline: u64 },
}
