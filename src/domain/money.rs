use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};

/// An amount in pence.
///
/// The content backend and the stored cart carry prices as decimal pounds
/// (`85`, `12.5`), so serde goes through pounds on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_pence(pence: u64) -> Self {
        Self(pence)
    }

    /// Rounds to the nearest penny; negative and non-finite inputs clamp to zero.
    pub fn from_pounds(pounds: f64) -> Self {
        if !pounds.is_finite() || pounds <= 0.0 {
            return Self::ZERO;
        }
        Self((pounds * 100.0).round() as u64)
    }

    pub const fn pence(self) -> u64 {
        self.0
    }

    pub fn as_pounds(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "£{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, rhs: u32) -> Money {
        Money(self.0.saturating_mul(u64::from(rhs)))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_pounds())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let pounds = f64::deserialize(deserializer)?;
        if !pounds.is_finite() || pounds < 0.0 {
            return Err(serde::de::Error::custom(format!(
                "price must be a non-negative amount, got {}",
                pounds
            )));
        }
        Ok(Money::from_pounds(pounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_in_pounds() {
        assert_eq!(Money::from_pence(8500).to_string(), "£85.00");
        assert_eq!(Money::from_pounds(12.5).to_string(), "£12.50");
        assert_eq!(Money::from_pounds(0.07).to_string(), "£0.07");
    }

    #[test]
    fn test_pounds_round_to_nearest_penny() {
        assert_eq!(Money::from_pounds(19.999).pence(), 2000);
        assert_eq!(Money::from_pounds(-3.0), Money::ZERO);
        assert_eq!(Money::from_pounds(f64::NAN), Money::ZERO);
    }

    #[test]
    fn test_deserialize_rejects_negative_prices() {
        let ok: Money = serde_json::from_str("45").unwrap();
        assert_eq!(ok.pence(), 4500);
        assert!(serde_json::from_str::<Money>("-1").is_err());
    }

    #[test]
    fn test_sum_and_multiply() {
        let total: Money = [Money::from_pence(250), Money::from_pence(1000)]
            .into_iter()
            .sum();
        assert_eq!(total * 3, Money::from_pence(3750));
    }
}
