use chance_raffle_common::types::RafflePhase;
use cosmwasm_std::{
    entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response, StdResult, Uint128,
};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute::{self, REQUEST_RANDOMNESS_REPLY_ID};
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query;
use crate::state::{RoundState, CONFIG, ROUND};

const CONTRACT_NAME: &str = "crates.io:chance-raffle";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let config = execute::validate_config(&deps, msg)?;
    CONFIG.save(deps.storage, &config)?;

    let round = RoundState {
        round_id: 0,
        phase: RafflePhase::Open,
        num_players: 0,
        pot: Uint128::zero(),
        round_start_time: env.block.time,
        last_winner: None,
        pending_request_id: None,
        settlement_requested_at: None,
    };
    ROUND.save(deps.storage, &round)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "raffle")
        .add_attribute("creator", info.sender.to_string())
        .add_attribute("entrance_fee", config.entrance_fee.to_string())
        .add_attribute("interval_seconds", config.interval_seconds.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::Enter {} => execute::enter(deps, env, info),
        ExecuteMsg::PerformUpkeep { perform_data } => {
            execute::perform_upkeep(deps, env, info, perform_data)
        }
        ExecuteMsg::FulfillRandomWords {
            request_id,
            random_words,
        } => execute::fulfill_random_words(deps, env, info, request_id, random_words),
        ExecuteMsg::RecoverSettlement {} => execute::recover_settlement(deps, env, info),
    }
}

#[entry_point]
pub fn reply(deps: DepsMut, env: Env, msg: Reply) -> Result<Response, ContractError> {
    match msg.id {
        REQUEST_RANDOMNESS_REPLY_ID => execute::randomness_requested(deps, env, msg),
        id => Err(ContractError::UnknownReplyId { id }),
    }
}

#[entry_point]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::RaffleState {} => query::query_raffle_state(deps),
        QueryMsg::Phase {} => query::query_phase(deps),
        QueryMsg::EntranceFee {} => query::query_entrance_fee(deps),
        QueryMsg::Interval {} => query::query_interval(deps),
        QueryMsg::Pot {} => query::query_pot(deps),
        QueryMsg::NumberOfPlayers {} => query::query_number_of_players(deps),
        QueryMsg::Player { index } => query::query_player(deps, index),
        QueryMsg::Players {
            round_id,
            start_after,
            limit,
        } => query::query_players(deps, round_id, start_after, limit),
        QueryMsg::RecentWinner {} => query::query_recent_winner(deps),
        QueryMsg::LatestTimestamp {} => query::query_latest_timestamp(deps),
        QueryMsg::PendingRequest {} => query::query_pending_request(deps),
        QueryMsg::NumWords {} => query::query_num_words(),
        QueryMsg::RequestConfirmations {} => query::query_request_confirmations(),
        QueryMsg::CheckUpkeep {} => query::query_check_upkeep(deps, env),
        QueryMsg::Round { round_id } => query::query_round(deps, round_id),
        QueryMsg::RoundHistory { start_after, limit } => {
            query::query_round_history(deps, start_after, limit)
        }
        QueryMsg::TotalWon { address } => query::query_total_won(deps, address),
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: "Cannot migrate from different contract type".to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
