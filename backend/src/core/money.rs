//! Money helpers
//!
//! CRITICAL: All money values are i64 (cents). Floating point dollars only
//! appear at the edges (agent input, display) and are converted here.

/// Convert a dollar amount to whole cents, rounding half away from zero
///
/// Returns `None` for NaN, infinities and values outside the i64 range.
///
/// # Example
/// ```
/// use vending_sim_core_rs::core::money::dollars_to_cents;
///
/// assert_eq!(dollars_to_cents(1.75), Some(175));
/// assert_eq!(dollars_to_cents(0.999), Some(100));
/// assert_eq!(dollars_to_cents(f64::NAN), None);
/// ```
pub fn dollars_to_cents(dollars: f64) -> Option<i64> {
    if !dollars.is_finite() {
        return None;
    }
    let cents = (dollars * 100.0).round();
    if cents < i64::MIN as f64 || cents > i64::MAX as f64 {
        return None;
    }
    Some(cents as i64)
}

/// Format cents as `$1,234.56` / `-$2.00`
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let dollars = abs / 100;
    let rem = abs % 100;

    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}${}.{:02}", sign, grouped, rem)
}
