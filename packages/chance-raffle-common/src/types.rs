use cosmwasm_schema::cw_serde;

/// Lifecycle phase of the single in-flight round.
#[cw_serde]
pub enum RafflePhase {
    /// Accepting entries.
    Open,
    /// Entry closed, waiting for the coordinator to deliver randomness.
    Calculating,
}

impl RafflePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            RafflePhase::Open => "open",
            RafflePhase::Calculating => "calculating",
        }
    }
}

impl std::fmt::Display for RafflePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
