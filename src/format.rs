use chrono::NaiveDate;

pub const CURRENCY_SYMBOL: &str = "R$";

fn format_with_separators(value: i64) -> String {
    let digits = value.abs().to_string().chars().rev().collect::<Vec<char>>();
    let mut out = Vec::new();
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('.');
        }
        out.push(*ch);
    }
    out.into_iter().rev().collect()
}

/// `1234.5` becomes `R$ 1.234,50`.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as i64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!(
        "{}{} {},{:02}",
        sign,
        CURRENCY_SYMBOL,
        format_with_separators(cents / 100),
        cents % 100
    )
}

pub fn format_percent(value: f64) -> String {
    format!("{:.0}%", value)
}

/// Date part of an ISO-8601 timestamp as sent by the backend.
fn parse_date(iso: &str) -> Option<NaiveDate> {
    let day = iso.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// `2025-01-05T12:00:00+00:00` becomes `05 Jan 2025`.
pub fn format_date(iso: &str) -> String {
    parse_date(iso)
        .map(|date| date.format("%d %b %Y").to_string())
        .unwrap_or_else(|| iso.to_string())
}

pub fn format_short_date(iso: &str) -> String {
    parse_date(iso)
        .map(|date| date.format("%d %b").to_string())
        .unwrap_or_else(|| iso.to_string())
}

/// `05/01/2025`, used for goal deadlines.
pub fn format_numeric_date(iso: &str) -> String {
    parse_date(iso)
        .map(|date| date.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| iso.to_string())
}

/// Value for an `<input type="date">` pre-filled from a backend timestamp.
pub fn date_input_value(iso: &str) -> String {
    parse_date(iso)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Converts an `<input type="date">` value back into a timestamp.
pub fn date_input_to_iso(value: &str) -> Option<String> {
    let value = value.trim();
    if value.len() != 10 {
        return None;
    }
    parse_date(value).map(|date| format!("{}T00:00:00+00:00", date.format("%Y-%m-%d")))
}
