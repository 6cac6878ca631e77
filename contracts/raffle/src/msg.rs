use chance_raffle_common::types::RafflePhase;
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Timestamp, Uint128, Uint256};

use crate::state::{RaffleConfig, RoundResult, RoundState};

#[cw_serde]
pub struct InstantiateMsg {
    pub vrf_coordinator: String,
    /// Hex-encoded coordinator key hash (32 bytes = 64 hex chars)
    pub gas_lane: String,
    pub subscription_id: u64,
    pub callback_gas_limit: u64,
    pub entrance_fee: Uint128,
    pub interval_seconds: u64,
    pub denom: String,
    pub fulfillment_timeout_seconds: Option<u64>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Buy one entry into the open round. Send at least the entrance fee.
    Enter {},
    /// Close entry and request randomness. Anyone can call once upkeep is needed.
    PerformUpkeep { perform_data: Option<Binary> },
    /// Randomness callback. Coordinator only.
    FulfillRandomWords {
        request_id: u64,
        random_words: Vec<Uint256>,
    },
    /// Reopen a round whose fulfillment never arrived. Anyone can call after
    /// the fulfillment timeout.
    RecoverSettlement {},
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(RaffleConfig)]
    Config {},
    #[returns(RoundState)]
    RaffleState {},
    #[returns(RafflePhase)]
    Phase {},
    #[returns(Uint128)]
    EntranceFee {},
    #[returns(u64)]
    Interval {},
    #[returns(Uint128)]
    Pot {},
    #[returns(u32)]
    NumberOfPlayers {},
    #[returns(Addr)]
    Player { index: u32 },
    /// Entries of `round_id`, or of the current round when omitted.
    #[returns(PlayersResponse)]
    Players {
        round_id: Option<u64>,
        start_after: Option<u32>,
        limit: Option<u32>,
    },
    #[returns(Option<Addr>)]
    RecentWinner {},
    #[returns(Timestamp)]
    LatestTimestamp {},
    #[returns(Option<u64>)]
    PendingRequest {},
    #[returns(u32)]
    NumWords {},
    #[returns(u16)]
    RequestConfirmations {},
    #[returns(CheckUpkeepResponse)]
    CheckUpkeep {},
    #[returns(Option<RoundResult>)]
    Round { round_id: u64 },
    #[returns(RoundHistoryResponse)]
    RoundHistory {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(Uint128)]
    TotalWon { address: String },
}

#[cw_serde]
pub struct CheckUpkeepResponse {
    pub upkeep_needed: bool,
    pub perform_data: Binary,
}

#[cw_serde]
pub struct PlayerEntry {
    pub index: u32,
    pub player: Addr,
}

#[cw_serde]
pub struct PlayersResponse {
    pub round_id: u64,
    pub players: Vec<PlayerEntry>,
}

#[cw_serde]
pub struct RoundHistoryResponse {
    pub rounds: Vec<RoundResult>,
}
