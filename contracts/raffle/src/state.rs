use chance_raffle_common::types::RafflePhase;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint128, Uint256};
use cw_storage_plus::{Item, Map};

pub const CONFIG: Item<RaffleConfig> = Item::new("config");
pub const ROUND: Item<RoundState> = Item::new("round");

/// Entries keyed by (round_id, entry index). Bumping `round_id` empties the
/// current round; settled rounds stay readable through `QueryMsg::Players`.
pub const PLAYERS: Map<(u64, u32), Addr> = Map::new("players");

/// Settled rounds, keyed by round_id.
pub const ROUND_RESULTS: Map<u64, RoundResult> = Map::new("round_results");

/// Lifetime prize total per winner
pub const USER_TOTAL_WON: Map<&Addr, Uint128> = Map::new("user_total_won");

#[cw_serde]
pub struct RaffleConfig {
    pub vrf_coordinator: Addr,
    /// Coordinator key hash, hex-encoded (32 bytes)
    pub gas_lane: String,
    pub subscription_id: u64,
    pub callback_gas_limit: u64,
    /// Minimum payment per entry, in `denom`
    pub entrance_fee: Uint128,
    /// Minimum round length before settlement may be triggered (seconds)
    pub interval_seconds: u64,
    pub denom: String,
    /// How long a settlement may wait for fulfillment before anyone can
    /// reopen the round. `None` disables recovery.
    pub fulfillment_timeout_seconds: Option<u64>,
}

#[cw_serde]
pub struct RoundState {
    pub round_id: u64,
    pub phase: RafflePhase,
    pub num_players: u32,
    pub pot: Uint128,
    pub round_start_time: Timestamp,
    pub last_winner: Option<Addr>,
    /// Set iff `phase == Calculating` at every transaction boundary.
    pub pending_request_id: Option<u64>,
    pub settlement_requested_at: Option<Timestamp>,
}

#[cw_serde]
pub struct RoundResult {
    pub round_id: u64,
    pub winner: Addr,
    pub prize: Uint128,
    pub num_players: u32,
    pub winner_index: u32,
    pub request_id: u64,
    pub random_word: Uint256,
    pub completed_at: Timestamp,
}
