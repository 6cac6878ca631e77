use chance_raffle_common::types::RafflePhase;
use chance_raffle_common::vrf::{
    VrfCoordinatorExecuteMsg, NUM_WORDS, REQUEST_CONFIRMATIONS, REQUEST_ID_ATTRIBUTE,
};
use cosmwasm_std::{
    coins, to_json_binary, Addr, BankMsg, Binary, Coin, DepsMut, Env, Event, MessageInfo, Reply,
    Response, StdError, SubMsg, SubMsgResponse, Timestamp, Uint128, Uint256, WasmMsg,
};

use crate::error::ContractError;
use crate::msg::InstantiateMsg;
use crate::state::{
    RaffleConfig, RoundResult, RoundState, CONFIG, PLAYERS, ROUND, ROUND_RESULTS, USER_TOTAL_WON,
};

pub const REQUEST_RANDOMNESS_REPLY_ID: u64 = 1;

/// Validate instantiate parameters and build the immutable config.
pub fn validate_config(
    deps: &DepsMut,
    msg: InstantiateMsg,
) -> Result<RaffleConfig, ContractError> {
    let key_hash = hex::decode(&msg.gas_lane).map_err(|_| ContractError::InvalidHex {
        field: "gas_lane".to_string(),
    })?;
    if key_hash.len() != 32 {
        return Err(ContractError::InvalidConfig {
            reason: format!("gas_lane must be 32 bytes, got {}", key_hash.len()),
        });
    }
    if msg.entrance_fee.is_zero() {
        return Err(ContractError::InvalidConfig {
            reason: "entrance_fee must be non-zero".to_string(),
        });
    }
    if msg.interval_seconds == 0 {
        return Err(ContractError::InvalidConfig {
            reason: "interval_seconds must be non-zero".to_string(),
        });
    }
    if msg.callback_gas_limit == 0 {
        return Err(ContractError::InvalidConfig {
            reason: "callback_gas_limit must be non-zero".to_string(),
        });
    }
    if msg.denom.is_empty() {
        return Err(ContractError::InvalidConfig {
            reason: "denom must be set".to_string(),
        });
    }
    if msg.fulfillment_timeout_seconds == Some(0) {
        return Err(ContractError::InvalidConfig {
            reason: "fulfillment_timeout_seconds must be non-zero when set".to_string(),
        });
    }

    Ok(RaffleConfig {
        vrf_coordinator: deps.api.addr_validate(&msg.vrf_coordinator)?,
        gas_lane: msg.gas_lane.to_lowercase(),
        subscription_id: msg.subscription_id,
        callback_gas_limit: msg.callback_gas_limit,
        entrance_fee: msg.entrance_fee,
        interval_seconds: msg.interval_seconds,
        denom: msg.denom,
        fulfillment_timeout_seconds: msg.fulfillment_timeout_seconds,
    })
}

/// Settlement predicate. Pure over committed state, shared by the
/// `CheckUpkeep` query and `PerformUpkeep`.
pub fn upkeep_needed(config: &RaffleConfig, round: &RoundState, now: Timestamp) -> bool {
    let interval_elapsed = now.seconds()
        >= round
            .round_start_time
            .seconds()
            .saturating_add(config.interval_seconds);

    round.phase == RafflePhase::Open
        && round.num_players > 0
        && !round.pot.is_zero()
        && interval_elapsed
}

/// Uniform pick over entries: `random_word mod num_players`.
pub fn winner_index(random_word: Uint256, num_players: u32) -> Result<u32, ContractError> {
    let remainder = random_word
        .checked_rem(Uint256::from(num_players))
        .map_err(StdError::from)?;
    let remainder = Uint128::try_from(remainder).map_err(StdError::from)?;
    u32::try_from(remainder.u128())
        .map_err(|_| StdError::generic_err("winner index out of range").into())
}

/// Calls that carry no payment must not strand coins outside the pot.
fn nonpayable(info: &MessageInfo) -> Result<(), ContractError> {
    if !info.funds.is_empty() {
        return Err(ContractError::NonPayable);
    }
    Ok(())
}

/// Sum of `denom` coins in the payment. Any other denom is rejected so it
/// cannot end up stranded outside the pot.
fn payment_amount(funds: &[Coin], denom: &str) -> Result<Uint128, ContractError> {
    let mut amount = Uint128::zero();
    for coin in funds {
        if coin.denom != denom {
            return Err(ContractError::InvalidFunds {
                expected: denom.to_string(),
                denom: coin.denom.clone(),
            });
        }
        amount = amount.checked_add(coin.amount)?;
    }
    Ok(amount)
}

/// Enter the open round. Each call is one entry; repeat entries are allowed.
pub fn enter(deps: DepsMut, _env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;

    let payment = payment_amount(&info.funds, &config.denom)?;
    if payment < config.entrance_fee {
        return Err(ContractError::InsufficientPayment {
            sent: payment,
            required: config.entrance_fee,
        });
    }

    let mut round = ROUND.load(deps.storage)?;
    if round.phase != RafflePhase::Open {
        return Err(ContractError::RoundNotOpen);
    }

    let index = round.num_players;
    PLAYERS.save(deps.storage, (round.round_id, index), &info.sender)?;
    round.num_players = index
        .checked_add(1)
        .ok_or_else(|| StdError::generic_err("entry count overflow"))?;
    round.pot = round.pot.checked_add(payment)?;
    ROUND.save(deps.storage, &round)?;

    Ok(Response::new()
        .add_attribute("action", "enter")
        .add_attribute("player", info.sender.to_string())
        .add_attribute("amount", payment.to_string())
        .add_event(
            Event::new("raffle_enter")
                .add_attribute("player", info.sender.to_string())
                .add_attribute("round_id", round.round_id.to_string())
                .add_attribute("entry_index", index.to_string())
                .add_attribute("amount", payment.to_string())
                .add_attribute("pot", round.pot.to_string()),
        ))
}

/// Close entry and ask the coordinator for randomness. Anyone can call.
///
/// The predicate is re-evaluated here; a caller's earlier `CheckUpkeep`
/// result is never trusted. The request id comes back through `reply`
/// within the same transaction.
pub fn perform_upkeep(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    _perform_data: Option<Binary>,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let config = CONFIG.load(deps.storage)?;
    let mut round = ROUND.load(deps.storage)?;

    if round.phase == RafflePhase::Calculating {
        return Err(ContractError::RoundAlreadySettling);
    }
    if !upkeep_needed(&config, &round, env.block.time) {
        return Err(ContractError::UpkeepNotNeeded {
            balance: round.pot,
            num_players: round.num_players,
            raffle_state: round.phase.to_string(),
        });
    }

    round.phase = RafflePhase::Calculating;
    round.pending_request_id = None;
    round.settlement_requested_at = Some(env.block.time);
    ROUND.save(deps.storage, &round)?;

    let request = WasmMsg::Execute {
        contract_addr: config.vrf_coordinator.to_string(),
        msg: to_json_binary(&VrfCoordinatorExecuteMsg::RequestRandomWords {
            key_hash: config.gas_lane.clone(),
            subscription_id: config.subscription_id,
            request_confirmations: REQUEST_CONFIRMATIONS,
            callback_gas_limit: config.callback_gas_limit,
            num_words: NUM_WORDS,
        })?,
        funds: vec![],
    };

    Ok(Response::new()
        .add_submessage(SubMsg::reply_on_success(
            request,
            REQUEST_RANDOMNESS_REPLY_ID,
        ))
        .add_attribute("action", "perform_upkeep")
        .add_attribute("round_id", round.round_id.to_string())
        .add_attribute("triggered_by", info.sender.to_string()))
}

/// Pull the issued request id out of the coordinator's wasm event.
fn parse_request_id(response: &SubMsgResponse, coordinator: &Addr) -> Option<u64> {
    response
        .events
        .iter()
        .filter(|event| event.ty == "wasm" || event.ty.starts_with("wasm-"))
        .filter(|event| {
            event
                .attributes
                .iter()
                .any(|attr| attr.key == "_contract_address" && attr.value == coordinator.as_str())
        })
        .flat_map(|event| event.attributes.iter())
        .find(|attr| attr.key == REQUEST_ID_ATTRIBUTE)
        .and_then(|attr| attr.value.parse::<u64>().ok())
}

/// Record the request id reported by the coordinator. Reply handler for
/// `perform_upkeep`'s sub-message.
pub fn randomness_requested(
    deps: DepsMut,
    _env: Env,
    reply: Reply,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let response = reply.result.into_result().map_err(StdError::generic_err)?;
    let request_id =
        parse_request_id(&response, &config.vrf_coordinator).ok_or(ContractError::MissingRequestId)?;

    let mut round = ROUND.load(deps.storage)?;
    if round.phase != RafflePhase::Calculating || round.pending_request_id.is_some() {
        return Err(ContractError::UnexpectedReply);
    }
    round.pending_request_id = Some(request_id);
    ROUND.save(deps.storage, &round)?;

    Ok(Response::new()
        .add_attribute("action", "randomness_requested")
        .add_attribute("request_id", request_id.to_string())
        .add_event(
            Event::new("raffle_requested_winner")
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("round_id", round.round_id.to_string())
                .add_attribute("num_players", round.num_players.to_string())
                .add_attribute("pot", round.pot.to_string()),
        ))
}

/// Randomness callback. Coordinator only.
///
/// 1. Match the request id against the live settlement
/// 2. winner = players[random_words[0] % num_players]
/// 3. Check the contract can actually pay the pot
/// 4. Record the result, reset the round, send the pot
///
/// Every check happens before the first write, so a failing call leaves the
/// round in `Calculating` with pot and entries intact and a retry with the
/// same request id can still settle it.
pub fn fulfill_random_words(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    request_id: u64,
    random_words: Vec<Uint256>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.vrf_coordinator {
        return Err(ContractError::Unauthorized {
            reason: "only the vrf coordinator can fulfill".to_string(),
        });
    }
    nonpayable(&info)?;

    let mut round = ROUND.load(deps.storage)?;
    if round.phase != RafflePhase::Calculating || round.pending_request_id != Some(request_id) {
        return Err(ContractError::UnknownRequest { request_id });
    }

    let random_word = *random_words.first().ok_or(ContractError::NoRandomWords)?;
    let index = winner_index(random_word, round.num_players)?;
    let winner = PLAYERS.load(deps.storage, (round.round_id, index))?;
    let prize = round.pot;

    let balance = deps
        .querier
        .query_balance(&env.contract.address, &config.denom)?;
    if balance.amount < prize {
        return Err(ContractError::PayoutTransferFailed {
            winner: winner.to_string(),
            amount: prize,
        });
    }

    let result = RoundResult {
        round_id: round.round_id,
        winner: winner.clone(),
        prize,
        num_players: round.num_players,
        winner_index: index,
        request_id,
        random_word,
        completed_at: env.block.time,
    };
    ROUND_RESULTS.save(deps.storage, round.round_id, &result)?;

    let total_won = USER_TOTAL_WON
        .may_load(deps.storage, &winner)?
        .unwrap_or_default();
    USER_TOTAL_WON.save(deps.storage, &winner, &total_won.checked_add(prize)?)?;

    let settled_round = round.round_id;
    round.round_id += 1;
    round.phase = RafflePhase::Open;
    round.num_players = 0;
    round.pot = Uint128::zero();
    round.round_start_time = env.block.time;
    round.last_winner = Some(winner.clone());
    round.pending_request_id = None;
    round.settlement_requested_at = None;
    ROUND.save(deps.storage, &round)?;

    let send_msg = BankMsg::Send {
        to_address: winner.to_string(),
        amount: coins(prize.u128(), &config.denom),
    };

    Ok(Response::new()
        .add_message(send_msg)
        .add_attribute("action", "fulfill_random_words")
        .add_attribute("request_id", request_id.to_string())
        .add_attribute("winner", winner.to_string())
        .add_attribute("prize", prize.to_string())
        .add_event(
            Event::new("raffle_winner_picked")
                .add_attribute("winner", winner.to_string())
                .add_attribute("round_id", settled_round.to_string())
                .add_attribute("prize", prize.to_string())
                .add_attribute("prize_denom", config.denom)
                .add_attribute("winner_index", index.to_string())
                .add_attribute("num_players", result.num_players.to_string())
                .add_attribute("request_id", request_id.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Reopen a round stuck in `Calculating` after the fulfillment timeout.
/// Anyone can call. Entries and pot carry over untouched.
pub fn recover_settlement(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let config = CONFIG.load(deps.storage)?;
    let timeout = config
        .fulfillment_timeout_seconds
        .ok_or(ContractError::RecoveryDisabled)?;

    let mut round = ROUND.load(deps.storage)?;
    if round.phase != RafflePhase::Calculating {
        return Err(ContractError::RecoveryNotAvailable);
    }
    let requested_at = round
        .settlement_requested_at
        .ok_or(ContractError::RecoveryNotAvailable)?;

    let deadline = requested_at.plus_seconds(timeout);
    if env.block.time <= deadline {
        return Err(ContractError::SettlementNotExpired {
            deadline: deadline.seconds(),
        });
    }

    let abandoned = round.pending_request_id.take();
    round.phase = RafflePhase::Open;
    round.settlement_requested_at = None;
    ROUND.save(deps.storage, &round)?;

    let abandoned_str = abandoned.map(|id| id.to_string()).unwrap_or_default();

    Ok(Response::new()
        .add_attribute("action", "recover_settlement")
        .add_attribute("round_id", round.round_id.to_string())
        .add_attribute("recovered_by", info.sender.to_string())
        .add_event(
            Event::new("raffle_settlement_recovered")
                .add_attribute("round_id", round.round_id.to_string())
                .add_attribute("abandoned_request_id", abandoned_str)
                .add_attribute("num_players", round.num_players.to_string())
                .add_attribute("pot", round.pot.to_string()),
        ))
}
