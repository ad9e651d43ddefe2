use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Ratio
// ---------------------------------------------------------------------------

/// Result of a division between two metric values.
///
/// A ratio with a zero denominator (or a non-finite result) is
/// `NotAvailable` and serializes as the string `"N/A"`; defined ratios
/// serialize as plain numbers (`1.2` means 120%).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Ratio {
    Value(f64),
    #[default]
    NotAvailable,
}

impl Ratio {
    pub const NOT_AVAILABLE_LABEL: &'static str = "N/A";

    /// `numerator / denominator`
    pub fn of(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 || !denominator.is_finite() || !numerator.is_finite() {
            return Ratio::NotAvailable;
        }
        Self::from_value(numerator / denominator)
    }

    /// `current / previous - 1`
    pub fn growth(current: f64, previous: f64) -> Self {
        Self::of(current, previous).map(|r| r - 1.0)
    }

    /// Growth between two ratios that may themselves be undefined
    pub fn growth_between(current: Ratio, previous: Ratio) -> Self {
        current.and_then(|c| previous.and_then(|p| Ratio::growth(c, p)))
    }

    pub fn from_value(value: f64) -> Self {
        if value.is_finite() {
            Ratio::Value(value)
        } else {
            Ratio::NotAvailable
        }
    }

    pub fn value(self) -> Option<f64> {
        match self {
            Ratio::Value(v) => Some(v),
            Ratio::NotAvailable => None,
        }
    }

    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Ratio::Value(v) => Self::from_value(f(v)),
            Ratio::NotAvailable => Ratio::NotAvailable,
        }
    }

    pub fn and_then(self, f: impl FnOnce(f64) -> Ratio) -> Self {
        match self {
            Ratio::Value(v) => f(v),
            Ratio::NotAvailable => Ratio::NotAvailable,
        }
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Value(v) => write!(f, "{v}"),
            Ratio::NotAvailable => f.write_str(Self::NOT_AVAILABLE_LABEL),
        }
    }
}

impl Serialize for Ratio {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Ratio::Value(v) => serializer.serialize_f64(*v),
            Ratio::NotAvailable => serializer.serialize_str(Self::NOT_AVAILABLE_LABEL),
        }
    }
}

impl<'de> Deserialize<'de> for Ratio {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(Ratio::from_value(v)),
            Raw::Text(s) if s == Self::NOT_AVAILABLE_LABEL => Ok(Ratio::NotAvailable),
            Raw::Text(s) => Err(de::Error::custom(format!(
                "expected a number or \"{}\", got \"{s}\"",
                Self::NOT_AVAILABLE_LABEL
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Display status
// ---------------------------------------------------------------------------

/// Visual status of an indicator (drives colour on the dashboard).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorStatus {
    Good,
    Bad,
    Neutral,
}

/// How a ratio is judged when picking its status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatioKind {
    /// Value against target, good at 100% and above
    Achievement,
    /// Relative change, good when positive
    Growth,
}

impl RatioKind {
    pub fn status(self, ratio: Ratio) -> IndicatorStatus {
        match (self, ratio) {
            (_, Ratio::NotAvailable) => IndicatorStatus::Neutral,
            (RatioKind::Achievement, Ratio::Value(v)) if v >= 1.0 => IndicatorStatus::Good,
            (RatioKind::Achievement, Ratio::Value(_)) => IndicatorStatus::Bad,
            (RatioKind::Growth, Ratio::Value(v)) if v > 0.0 => IndicatorStatus::Good,
            // flat growth is shown as a decline
            (RatioKind::Growth, Ratio::Value(_)) => IndicatorStatus::Bad,
        }
    }
}

/// A computed ratio together with its formatted text and status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioIndicator {
    pub value: Ratio,
    /// Percentage text, e.g. "120,00%" or "N/A"
    pub display: String,
    pub status: IndicatorStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_denominator_is_not_available() {
        assert_eq!(Ratio::of(120.0, 0.0), Ratio::NotAvailable);
        assert_eq!(Ratio::growth(0.0, 0.0), Ratio::NotAvailable);
        assert_eq!(Ratio::of(0.0, 10.0), Ratio::Value(0.0));
    }

    #[test]
    fn test_growth_between_propagates_not_available() {
        let growth = Ratio::growth_between(Ratio::Value(10.0), Ratio::NotAvailable);
        assert_eq!(growth, Ratio::NotAvailable);

        let growth = Ratio::growth_between(Ratio::Value(15.0), Ratio::Value(10.0));
        assert_eq!(growth, Ratio::Value(0.5));
    }

    #[test]
    fn test_ratio_serialization() {
        assert_eq!(serde_json::to_string(&Ratio::Value(1.5)).unwrap(), "1.5");
        assert_eq!(serde_json::to_string(&Ratio::NotAvailable).unwrap(), "\"N/A\"");

        let back: Ratio = serde_json::from_str("\"N/A\"").unwrap();
        assert_eq!(back, Ratio::NotAvailable);
        let back: Ratio = serde_json::from_str("2.4").unwrap();
        assert_eq!(back, Ratio::Value(2.4));
        assert!(serde_json::from_str::<Ratio>("\"infinity\"").is_err());
    }

    #[test]
    fn test_status_by_kind() {
        assert_eq!(RatioKind::Achievement.status(Ratio::Value(1.0)), IndicatorStatus::Good);
        assert_eq!(RatioKind::Achievement.status(Ratio::Value(0.8)), IndicatorStatus::Bad);
        assert_eq!(RatioKind::Growth.status(Ratio::Value(0.1)), IndicatorStatus::Good);
        assert_eq!(RatioKind::Growth.status(Ratio::Value(-0.1)), IndicatorStatus::Bad);
        assert_eq!(RatioKind::Growth.status(Ratio::Value(0.0)), IndicatorStatus::Bad);
        assert_eq!(RatioKind::Growth.status(Ratio::NotAvailable), IndicatorStatus::Neutral);
    }
}
