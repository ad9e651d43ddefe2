use contracts::shared::indicators::Ratio;

/// Formats a number with thousands separators (dots), id-ID style
///
/// # Examples
/// ```
/// use honai_backend::shared::format::format_number;
/// assert_eq!(format_number(1234567), "1.234.567");
/// assert_eq!(format_number(42), "42");
/// assert_eq!(format_number(0), "0");
/// ```
pub fn format_number(n: usize) -> String {
    group_thousands(&n.to_string())
}

fn group_thousands(digits: &str) -> String {
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push('.');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Formats a ratio as an id-ID percentage with two decimals:
/// `1.2` → `"120,00%"`, undefined → `"N/A"`.
pub fn format_percent(ratio: Ratio) -> String {
    let Some(value) = ratio.value() else {
        return Ratio::NOT_AVAILABLE_LABEL.to_string();
    };

    let hundredths = (value * 10_000.0).round();
    if !hundredths.is_finite() {
        return Ratio::NOT_AVAILABLE_LABEL.to_string();
    }
    let negative = hundredths < 0.0;
    let fixed = format!("{:.2}", hundredths.abs() / 100.0);
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    format!(
        "{}{},{}%",
        if negative { "-" } else { "" },
        group_thousands(whole),
        fraction
    )
}
