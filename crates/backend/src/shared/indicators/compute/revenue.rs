use contracts::dashboards::d100_revenue::dto::{BaseMetrics, DerivedMetrics};
use contracts::shared::indicators::{Ratio, RatioKind};
use contracts::shared::period::PeriodContext;

use crate::shared::indicators::{achievement, growth, indicator};

/// Month-to-date value projected to the full month
pub fn run_rate_projection(current: f64, period: &PeriodContext) -> Ratio {
    Ratio::of(current, period.day_of_month as f64).map(|daily| daily * period.days_in_month as f64)
}

/// Display ratios of one revenue node
pub fn compute_ratios(base: &BaseMetrics, period: &PeriodContext) -> DerivedMetrics {
    let projected = run_rate_projection(base.current_value, period);

    DerivedMetrics {
        achievement_to_target: achievement(base.current_value, base.target_value),
        achievement_daily_run_rate: indicator(
            projected.and_then(|p| Ratio::of(p, base.target_value)),
            RatioKind::Achievement,
        ),
        month_over_month: growth(base.current_value, base.previous_month_value),
        year_over_year: growth(base.current_value, base.previous_year_same_month_value),
        year_to_date_growth: growth(base.year_to_date_value, base.previous_year_to_date_value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::shared::indicators::IndicatorStatus;

    fn period(day: u32, days_in_month: u32) -> PeriodContext {
        PeriodContext {
            selected_date: NaiveDate::from_ymd_opt(2025, 6, day).unwrap(),
            day_of_month: day,
            days_in_month,
            days_in_previous_month: 31,
            days_in_month_minus_2: 30,
            days_in_month_minus_3: 31,
        }
    }

    fn approx(ratio: Ratio, expected: f64) -> bool {
        ratio.value().map_or(false, |v| (v - expected).abs() < 1e-9)
    }

    #[test]
    fn test_achievement_and_run_rate() {
        let base = BaseMetrics {
            current_value: 120.0,
            target_value: 100.0,
            ..Default::default()
        };
        let derived = compute_ratios(&base, &period(15, 30));

        assert!(approx(derived.achievement_to_target.value, 1.20));
        assert_eq!(derived.achievement_to_target.display, "120,00%");
        assert!(approx(derived.achievement_daily_run_rate.value, 2.40));
        assert_eq!(derived.achievement_daily_run_rate.display, "240,00%");
    }

    #[test]
    fn test_month_over_month_growth() {
        let base = BaseMetrics {
            current_value: 110.0,
            previous_month_value: 100.0,
            ..Default::default()
        };
        let derived = compute_ratios(&base, &period(15, 30));

        assert!(approx(derived.month_over_month.value, 0.10));
        assert_eq!(derived.month_over_month.status, IndicatorStatus::Good);
    }

    #[test]
    fn test_zero_target_is_not_available() {
        let base = BaseMetrics {
            current_value: 120.0,
            target_value: 0.0,
            ..Default::default()
        };
        let derived = compute_ratios(&base, &period(15, 30));

        assert_eq!(derived.achievement_to_target.value, Ratio::NotAvailable);
        assert_eq!(derived.achievement_daily_run_rate.value, Ratio::NotAvailable);
        assert_eq!(derived.year_over_year.value, Ratio::NotAvailable);
        assert_eq!(derived.year_to_date_growth.display, "N/A");

        let json = serde_json::to_value(&derived).unwrap();
        assert_eq!(json["achievement_to_target"]["value"], "N/A");
    }

    #[test]
    fn test_year_comparisons() {
        let base = BaseMetrics {
            current_value: 80.0,
            previous_year_same_month_value: 100.0,
            year_to_date_value: 500.0,
            previous_year_to_date_value: 400.0,
            ..Default::default()
        };
        let derived = compute_ratios(&base, &period(1, 30));

        assert!(approx(derived.year_over_year.value, -0.20));
        assert_eq!(derived.year_over_year.status, IndicatorStatus::Bad);
        assert!(approx(derived.year_to_date_growth.value, 0.25));
    }

    #[test]
    fn test_ratios_are_deterministic() {
        let base = BaseMetrics {
            current_value: 37.0,
            target_value: 41.0,
            previous_month_value: 13.0,
            ..Default::default()
        };
        let p = period(7, 30);
        assert_eq!(compute_ratios(&base, &p), compute_ratios(&base, &p));
    }
}
