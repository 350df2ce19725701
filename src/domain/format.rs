use once_cell::sync::Lazy;
use regex::Regex;

static LEADING_FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid float pattern")
});

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn format_number_with_commas(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return format_js_number(value);
    }
    let text = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (text.as_str(), None),
    };
    let is_zero = text.chars().all(|ch| ch == '0' || ch == '.');
    let mut out = String::new();
    if value.is_sign_negative() && !is_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// Display form of a numeric cell: grouped thousands and at most three
/// fraction digits, trailing zeros dropped (`1234.5` -> `1,234.5`).
pub fn format_locale_number(value: f64) -> String {
    let mut text = format_number_with_commas(value, 3);
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    text
}

/// Plain number to text the way the sheet script stringifies it.
pub fn format_js_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

pub fn strip_thousands(value: &str) -> String {
    value.replace(',', "")
}

/// Parses the leading numeric prefix, ignoring trailing text (`"12.5 INR"` -> 12.5).
pub fn parse_leading_float(value: &str) -> Option<f64> {
    let trimmed = value.trim_start();
    LEADING_FLOAT
        .find(trimmed)
        .and_then(|found| found.as_str().parse::<f64>().ok())
}

pub fn parse_price(value: &str) -> Option<f64> {
    parse_leading_float(&strip_thousands(value))
}

pub fn format_price(value: f64) -> String {
    format!("{value:.2}")
}

pub fn digits_only(value: &str) -> String {
    value.chars().filter(|ch| ch.is_ascii_digit()).collect()
}
