use chrono::{Datelike, Days, Local, NaiveDate};
use contracts::shared::period::PeriodContext;

/// Number of days in a month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

/// Year and month `back` months before the given one
pub fn months_before(year: i32, month: u32, back: u32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 - back as i32;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// Calendar facts for the selected "as-of" date
pub fn period_context(selected: NaiveDate) -> PeriodContext {
    let (year, month) = (selected.year(), selected.month());
    let lagged = |back: u32| {
        let (y, m) = months_before(year, month, back);
        days_in_month(y, m)
    };

    PeriodContext {
        selected_date: selected,
        day_of_month: selected.day(),
        days_in_month: days_in_month(year, month),
        days_in_previous_month: lagged(1),
        days_in_month_minus_2: lagged(2),
        days_in_month_minus_3: lagged(3),
    }
}

/// Explicit date from the request, otherwise `today - lag_days`
pub fn resolve_selected_date(
    requested: Option<NaiveDate>,
    today: NaiveDate,
    lag_days: u32,
) -> NaiveDate {
    requested.unwrap_or_else(|| {
        today
            .checked_sub_days(Days::new(lag_days as u64))
            .unwrap_or(today)
    })
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 12), 31);
    }

    #[test]
    fn test_months_before_crosses_year() {
        assert_eq!(months_before(2025, 3, 1), (2025, 2));
        assert_eq!(months_before(2025, 1, 1), (2024, 12));
        assert_eq!(months_before(2025, 2, 3), (2024, 11));
        assert_eq!(months_before(2025, 6, 0), (2025, 6));
    }

    #[test]
    fn test_period_context_for_march_of_leap_year() {
        let ctx = period_context(date(2024, 3, 15));

        assert_eq!(ctx.day_of_month, 15);
        assert_eq!(ctx.days_in_month, 31);
        assert_eq!(ctx.days_in_previous_month, 29);
        assert_eq!(ctx.days_in_month_minus_2, 31);
        assert_eq!(ctx.days_in_month_minus_3, 31);
        assert_eq!(ctx.lag_days(), [15, 29, 31, 31]);
    }

    #[test]
    fn test_period_context_in_january() {
        let ctx = period_context(date(2025, 1, 2));

        assert_eq!(ctx.days_in_previous_month, 31); // December
        assert_eq!(ctx.days_in_month_minus_2, 30); // November
        assert_eq!(ctx.days_in_month_minus_3, 31); // October
    }

    #[test]
    fn test_resolve_selected_date() {
        let today = date(2025, 3, 1);

        assert_eq!(resolve_selected_date(None, today, 2), date(2025, 2, 27));
        assert_eq!(resolve_selected_date(None, today, 3), date(2025, 2, 26));
        assert_eq!(
            resolve_selected_date(Some(date(2024, 12, 31)), today, 2),
            date(2024, 12, 31)
        );
    }
}
