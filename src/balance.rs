use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use anyhow::Context;

pub const DROPS_PER_XRP: u64 = 1_000_000;

/// Ledger account identifier, taken verbatim from the input file.
pub type Address = String;

pub type BalanceResults = HashMap<Address, BalanceResult>;

/// Amount of XRP, kept as the exact number of drops the ledger reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Xrp(u64);

impl Xrp {
    pub fn from_drops(drops: u64) -> Self {
        Xrp(drops)
    }

    pub fn drops(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl FromStr for Xrp {
    type Err = anyhow::Error;

    fn from_str(drops: &str) -> Result<Self, Self::Err> {
        let drops = u64::from_str(drops.trim())
            .with_context(|| format!("invalid drops value {:?}", drops))?;
        Ok(Xrp(drops))
    }
}

// drops / 1_000_000 written out exactly, keeping at least one fractional digit
impl fmt::Display for Xrp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / DROPS_PER_XRP;
        let fraction = format!("{:06}", self.0 % DROPS_PER_XRP);
        let fraction = fraction.trim_end_matches('0');
        if fraction.is_empty() {
            write!(f, "{}.0", whole)
        } else {
            write!(f, "{}.{}", whole, fraction)
        }
    }
}

/// Outcome of one balance lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BalanceResult {
    /// The account exists and holds this amount.
    Amount(Xrp),
    /// The endpoint answered without account data.
    ZeroOrError(String),
    /// The request itself failed.
    Failure(String),
}

impl BalanceResult {
    pub fn failure(description: impl fmt::Display) -> Self {
        BalanceResult::Failure(format!("An error occurred: {}", description))
    }

    /// Positive amount worth writing to the output file.
    pub fn reportable_amount(&self) -> Option<Xrp> {
        match self {
            BalanceResult::Amount(amount) if !amount.is_zero() => Some(*amount),
            _ => None,
        }
    }
}

impl fmt::Display for BalanceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceResult::Amount(amount) => write!(f, "{}", amount),
            BalanceResult::ZeroOrError(message) => write!(f, "Zero: {}", message),
            BalanceResult::Failure(message) => write!(f, "{}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::balance::{BalanceResult, Xrp};
    use std::str::FromStr;

    #[test]
    fn xrp_display() {
        assert_eq!(Xrp::from_drops(12_500_000).to_string(), "12.5");
        assert_eq!(Xrp::from_drops(1_000_000).to_string(), "1.0");
        assert_eq!(Xrp::from_drops(1).to_string(), "0.000001");
        assert_eq!(Xrp::from_drops(0).to_string(), "0.0");
        assert_eq!(Xrp::from_drops(20_123_456).to_string(), "20.123456");
        assert_eq!(
            Xrp::from_drops(99_999_999_999_999_999).to_string(),
            "99999999999.999999"
        );
    }

    #[test]
    fn xrp_from_str() {
        assert_eq!(Xrp::from_str("12500000").unwrap().drops(), 12_500_000);
        assert_eq!(Xrp::from_str(" 42 ").unwrap(), Xrp::from_drops(42));
        assert!(Xrp::from_str("-5").is_err());
        assert!(Xrp::from_str("1.5").is_err());
        assert!(Xrp::from_str("").is_err());
    }

    #[test]
    fn only_positive_amounts_are_reportable() {
        let positive = BalanceResult::Amount(Xrp::from_drops(5));
        assert_eq!(positive.reportable_amount(), Some(Xrp::from_drops(5)));
        assert_eq!(BalanceResult::Amount(Xrp::default()).reportable_amount(), None);
        assert_eq!(
            BalanceResult::ZeroOrError("0".to_string()).reportable_amount(),
            None
        );
        assert_eq!(BalanceResult::failure("timeout").reportable_amount(), None);
    }

    #[test]
    fn result_display() {
        assert_eq!(
            BalanceResult::failure("timeout").to_string(),
            "An error occurred: timeout"
        );
        assert_eq!(
            BalanceResult::ZeroOrError("Account not found.".to_string()).to_string(),
            "Zero: Account not found."
        );
        assert_eq!(
            BalanceResult::Amount(Xrp::from_drops(2_000_000)).to_string(),
            "2.0"
        );
    }
}
