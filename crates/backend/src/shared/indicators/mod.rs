pub mod compute;

use contracts::shared::indicators::{Ratio, RatioIndicator, RatioKind};

use crate::shared::format::format_percent;

/// Wraps a ratio with its display text and status
pub fn indicator(value: Ratio, kind: RatioKind) -> RatioIndicator {
    RatioIndicator {
        value,
        display: format_percent(value),
        status: kind.status(value),
    }
}

/// `value / target`
pub fn achievement(value: f64, target: f64) -> RatioIndicator {
    indicator(Ratio::of(value, target), RatioKind::Achievement)
}

/// `current / previous - 1`
pub fn growth(current: f64, previous: f64) -> RatioIndicator {
    indicator(Ratio::growth(current, previous), RatioKind::Growth)
}

/// Growth between two ratios, N/A if either is
pub fn growth_between(current: Ratio, previous: Ratio) -> RatioIndicator {
    indicator(Ratio::growth_between(current, previous), RatioKind::Growth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::indicators::IndicatorStatus;

    #[test]
    fn test_achievement_indicator() {
        let ind = achievement(120.0, 100.0);
        assert_eq!(ind.display, "120,00%");
        assert_eq!(ind.status, IndicatorStatus::Good);

        let ind = achievement(50.0, 0.0);
        assert_eq!(ind.value, Ratio::NotAvailable);
        assert_eq!(ind.display, "N/A");
        assert_eq!(ind.status, IndicatorStatus::Neutral);
    }

    #[test]
    fn test_negative_growth_is_bad() {
        let ind = growth(90.0, 100.0);
        assert_eq!(ind.status, IndicatorStatus::Bad);
        assert_eq!(ind.display, "-10,00%");
    }
}
