use chance_raffle_common::vrf::{NUM_WORDS, REQUEST_CONFIRMATIONS};
use cosmwasm_std::{to_json_binary, Binary, Deps, Env, Order, StdError, StdResult};
use cw_storage_plus::Bound;

use crate::execute::upkeep_needed;
use crate::msg::{CheckUpkeepResponse, PlayerEntry, PlayersResponse, RoundHistoryResponse};
use crate::state::{CONFIG, PLAYERS, ROUND, ROUND_RESULTS, USER_TOTAL_WON};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_raffle_state(deps: Deps) -> StdResult<Binary> {
    let round = ROUND.load(deps.storage)?;
    to_json_binary(&round)
}

pub fn query_phase(deps: Deps) -> StdResult<Binary> {
    let round = ROUND.load(deps.storage)?;
    to_json_binary(&round.phase)
}

pub fn query_entrance_fee(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config.entrance_fee)
}

pub fn query_interval(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config.interval_seconds)
}

pub fn query_pot(deps: Deps) -> StdResult<Binary> {
    let round = ROUND.load(deps.storage)?;
    to_json_binary(&round.pot)
}

pub fn query_number_of_players(deps: Deps) -> StdResult<Binary> {
    let round = ROUND.load(deps.storage)?;
    to_json_binary(&round.num_players)
}

/// Entry at `index` in the current round. Errors when out of range.
pub fn query_player(deps: Deps, index: u32) -> StdResult<Binary> {
    let round = ROUND.load(deps.storage)?;
    if index >= round.num_players {
        return Err(StdError::not_found(format!(
            "player index {index} (round has {} entries)",
            round.num_players
        )));
    }
    let player = PLAYERS.load(deps.storage, (round.round_id, index))?;
    to_json_binary(&player)
}

pub fn query_players(
    deps: Deps,
    round_id: Option<u64>,
    start_after: Option<u32>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let round_id = match round_id {
        Some(id) => id,
        None => ROUND.load(deps.storage)?.round_id,
    };
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let players: Vec<_> = PLAYERS
        .prefix(round_id)
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(index, player)| PlayerEntry { index, player })
        .collect();

    to_json_binary(&PlayersResponse { round_id, players })
}

pub fn query_recent_winner(deps: Deps) -> StdResult<Binary> {
    let round = ROUND.load(deps.storage)?;
    to_json_binary(&round.last_winner)
}

pub fn query_latest_timestamp(deps: Deps) -> StdResult<Binary> {
    let round = ROUND.load(deps.storage)?;
    to_json_binary(&round.round_start_time)
}

pub fn query_pending_request(deps: Deps) -> StdResult<Binary> {
    let round = ROUND.load(deps.storage)?;
    to_json_binary(&round.pending_request_id)
}

pub fn query_num_words() -> StdResult<Binary> {
    to_json_binary(&NUM_WORDS)
}

pub fn query_request_confirmations() -> StdResult<Binary> {
    to_json_binary(&REQUEST_CONFIRMATIONS)
}

/// Side-effect free; safe for the upkeep scheduler to poll.
pub fn query_check_upkeep(deps: Deps, env: Env) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let round = ROUND.load(deps.storage)?;
    to_json_binary(&CheckUpkeepResponse {
        upkeep_needed: upkeep_needed(&config, &round, env.block.time),
        perform_data: Binary::default(),
    })
}

pub fn query_round(deps: Deps, round_id: u64) -> StdResult<Binary> {
    let result = ROUND_RESULTS.may_load(deps.storage, round_id)?;
    to_json_binary(&result)
}

pub fn query_round_history(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let rounds: Vec<_> = ROUND_RESULTS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(_, result)| result)
        .collect();

    to_json_binary(&RoundHistoryResponse { rounds })
}

pub fn query_total_won(deps: Deps, address: String) -> StdResult<Binary> {
    let addr = deps.api.addr_validate(&address)?;
    let total = USER_TOTAL_WON
        .may_load(deps.storage, &addr)?
        .unwrap_or_default();
    to_json_binary(&total)
}
