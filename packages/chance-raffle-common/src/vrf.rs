//! Wire interface between a raffle and its randomness coordinator.
//!
//! The coordinator is an external contract. A consumer dispatches
//! `RequestRandomWords`, the coordinator answers synchronously with a request
//! id (reported as the `request_id` attribute of its wasm event) and later
//! calls back `FulfillRandomWords` on the consumer from its own transaction.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint256;

/// Random words requested per settlement.
pub const NUM_WORDS: u32 = 1;

/// Block confirmations the coordinator waits before answering.
pub const REQUEST_CONFIRMATIONS: u16 = 3;

/// Attribute key the coordinator uses to report the issued request id.
pub const REQUEST_ID_ATTRIBUTE: &str = "request_id";

/// Messages the coordinator accepts from consumers.
#[cw_serde]
pub enum VrfCoordinatorExecuteMsg {
    RequestRandomWords {
        /// Hex-encoded 32 byte key hash selecting the gas lane.
        key_hash: String,
        subscription_id: u64,
        request_confirmations: u16,
        /// Gas the coordinator must forward to the fulfillment callback.
        callback_gas_limit: u64,
        num_words: u32,
    },
}

/// Callback the coordinator sends to the consumer.
#[cw_serde]
pub enum VrfConsumerExecuteMsg {
    FulfillRandomWords {
        request_id: u64,
        random_words: Vec<Uint256>,
    },
}
