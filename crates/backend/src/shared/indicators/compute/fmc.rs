use contracts::dashboards::d101_fmc::dto::{
    DailyGrowthChain, FmcDerivedMetrics, FmcMetrics, LaggedCount, LaggedRatios,
};
use contracts::shared::indicators::Ratio;
use contracts::shared::period::PeriodContext;

use crate::shared::indicators::{growth, growth_between};

fn lagged(values: [Ratio; 4]) -> LaggedRatios {
    LaggedRatios {
        mtd: values[0],
        m1: values[1],
        m2: values[2],
        m3: values[3],
    }
}

/// Value per elapsed day for MTD, M-1, M-2 and M-3
fn per_day(values: [f64; 4], period: &PeriodContext) -> [Ratio; 4] {
    let days = period.lag_days();
    std::array::from_fn(|i| Ratio::of(values[i], days[i] as f64))
}

/// MoM growth of consecutive daily rates
fn daily_chain(daily: [Ratio; 4]) -> DailyGrowthChain {
    DailyGrowthChain {
        mom_daily: growth_between(daily[0], daily[1]),
        mom_daily_1: growth_between(daily[1], daily[2]),
        mom_daily_2: growth_between(daily[2], daily[3]),
    }
}

fn count_chain(count: &LaggedCount, period: &PeriodContext) -> DailyGrowthChain {
    daily_chain(per_day(count.as_array().map(|c| c as f64), period))
}

/// Display ratios of one FMC node
pub fn compute_fmc_ratios(metrics: &FmcMetrics, period: &PeriodContext) -> FmcDerivedMetrics {
    let revenue = metrics.revenue();
    let subscribers = metrics.subscribers();
    let days = period.lag_days();

    let daily_rate = per_day(revenue, period);
    let arpu: [Ratio; 4] = std::array::from_fn(|i| Ratio::of(revenue[i], subscribers[i] as f64));
    let daily_arpu: [Ratio; 4] =
        std::array::from_fn(|i| arpu[i].and_then(|a| Ratio::of(a, days[i] as f64)));

    FmcDerivedMetrics {
        daily_rate: lagged(daily_rate),
        revenue_daily_growth: daily_chain(daily_rate),
        arpu: lagged(arpu),
        arpu_daily_growth: daily_chain(daily_arpu),
        rgb_all_daily_growth: count_chain(&metrics.rgb.rgb_all, period),
        rgb_voice_daily_growth: count_chain(&metrics.rgb.rgb_voice, period),
        rgb_digital_daily_growth: count_chain(&metrics.rgb.rgb_digital, period),
        rgb_data_daily_growth: count_chain(&metrics.rgb.rgb_data, period),
        payload_growth: growth(metrics.payload, metrics.payload_m1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use contracts::shared::indicators::IndicatorStatus;

    // June 10th: MTD 10 days, May 31, April 30, March 31
    fn june_10() -> PeriodContext {
        PeriodContext {
            selected_date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            day_of_month: 10,
            days_in_month: 30,
            days_in_previous_month: 31,
            days_in_month_minus_2: 30,
            days_in_month_minus_3: 31,
        }
    }

    fn approx(ratio: Ratio, expected: f64) -> bool {
        ratio.value().map_or(false, |v| (v - expected).abs() < 1e-9)
    }

    #[test]
    fn test_daily_rate_chain() {
        let metrics = FmcMetrics {
            rev_mtd: 100.0,
            rev_m1: 310.0,
            rev_m2: 150.0,
            rev_m3: 0.0,
            ..Default::default()
        };
        let derived = compute_fmc_ratios(&metrics, &june_10());

        assert!(approx(derived.daily_rate.mtd, 10.0));
        assert!(approx(derived.daily_rate.m1, 10.0));
        assert!(approx(derived.daily_rate.m2, 5.0));
        assert!(approx(derived.daily_rate.m3, 0.0));

        assert!(approx(derived.revenue_daily_growth.mom_daily.value, 0.0));
        // flat growth counts as a decline
        assert_eq!(derived.revenue_daily_growth.mom_daily.status, IndicatorStatus::Bad);
        assert!(approx(derived.revenue_daily_growth.mom_daily_1.value, 1.0));
        // M-3 daily rate is zero
        assert_eq!(derived.revenue_daily_growth.mom_daily_2.value, Ratio::NotAvailable);
    }

    #[test]
    fn test_arpu_chain() {
        let metrics = FmcMetrics {
            rev_mtd: 200.0,
            rev_m1: 620.0,
            rev_m2: 300.0,
            rev_m3: 310.0,
            subs: 2,
            subs_m1: 2,
            subs_m2: 0,
            subs_m3: 1,
            ..Default::default()
        };
        let derived = compute_fmc_ratios(&metrics, &june_10());

        assert!(approx(derived.arpu.mtd, 100.0));
        assert!(approx(derived.arpu.m1, 310.0));
        assert_eq!(derived.arpu.m2, Ratio::NotAvailable);
        assert!(approx(derived.arpu.m3, 310.0));

        // daily ARPU 10 vs 10
        assert!(approx(derived.arpu_daily_growth.mom_daily.value, 0.0));
        assert_eq!(derived.arpu_daily_growth.mom_daily_1.display, "N/A");
        assert_eq!(derived.arpu_daily_growth.mom_daily_2.display, "N/A");
    }

    #[test]
    fn test_rgb_and_payload_growth() {
        let mut metrics = FmcMetrics {
            payload: 150.0,
            payload_m1: 100.0,
            ..Default::default()
        };
        metrics.rgb.rgb_all = LaggedCount {
            mtd: 20,
            m1: 31,
            m2: 30,
            m3: 62,
        };
        let derived = compute_fmc_ratios(&metrics, &june_10());

        assert!(approx(derived.rgb_all_daily_growth.mom_daily.value, 1.0));
        assert!(approx(derived.rgb_all_daily_growth.mom_daily_1.value, 0.0));
        assert!(approx(derived.rgb_all_daily_growth.mom_daily_2.value, -0.5));
        assert_eq!(derived.rgb_voice_daily_growth.mom_daily.value, Ratio::NotAvailable);
        assert!(approx(derived.payload_growth.value, 0.5));
    }
}
