pub mod types;
pub mod vrf;

pub use types::RafflePhase;
pub use vrf::{
    VrfConsumerExecuteMsg, VrfCoordinatorExecuteMsg, NUM_WORDS, REQUEST_CONFIRMATIONS,
    REQUEST_ID_ATTRIBUTE,
};
