use settlement_types::U256;

/// `OPERATOR_BOND` and `CHALLENGE_PERIOD` from §4.5, made configurable so
/// tests can shrink the challenge window instead of replaying thousands
/// of host blocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettlementConfig {
    pub operator_bond: U256,
    pub challenge_period: u64,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            operator_bond: U256::ONE_UNIT,
            challenge_period: 50_400,
        }
    }
}
