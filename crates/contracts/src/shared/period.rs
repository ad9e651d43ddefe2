use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Calendar facts about the selected "as-of" date used by derived ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodContext {
    pub selected_date: NaiveDate,
    /// Day of the selected month (1..=31), i.e. days elapsed month-to-date
    pub day_of_month: u32,
    pub days_in_month: u32,
    pub days_in_previous_month: u32,
    pub days_in_month_minus_2: u32,
    pub days_in_month_minus_3: u32,
}

impl PeriodContext {
    /// Elapsed days for MTD, M-1, M-2 and M-3, in that order
    pub fn lag_days(&self) -> [u32; 4] {
        [
            self.day_of_month,
            self.days_in_previous_month,
            self.days_in_month_minus_2,
            self.days_in_month_minus_3,
        ]
    }
}
