//! Display formatting for amounts, measures and dates

use chrono::NaiveDate;

/// Default currency symbol for quote amounts
pub const DEFAULT_CURRENCY_SYMBOL: &str = "R$";

/// Date format used on printed quotes
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Format an amount as `R$ 1,234.56`.
///
/// Rounds to cents; negative amounts get a leading minus sign.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!(
        "{}{} {}.{:02}",
        sign,
        symbol,
        group_thousands(cents / 100),
        cents % 100
    )
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a length in metres with two decimals
pub fn format_meters(value: f64) -> String {
    format!("{:.2} m", value)
}

/// Format a quantity, dropping the fraction for whole numbers
pub fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// Format a date for printing
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
