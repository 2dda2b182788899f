use serde::{Deserialize, Serialize};
use std::fmt;

/// Record count as found in the wild: generators emit an integer, a float
/// (`45.0`) or a preformatted string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordCount {
    Number(i64),
    Float(f64),
    Text(String),
}

impl RecordCount {
    /// Zero and empty strings are treated as "no count".
    pub fn is_blank(&self) -> bool {
        match self {
            RecordCount::Number(n) => *n == 0,
            RecordCount::Float(x) => *x == 0.0 || x.is_nan(),
            RecordCount::Text(s) => s.is_empty(),
        }
    }

    /// The count as a length, when it is a non-negative whole number.
    pub fn as_len(&self) -> Option<usize> {
        match self {
            RecordCount::Number(n) => usize::try_from(*n).ok(),
            RecordCount::Float(x) if x.fract() == 0.0 && *x >= 0.0 && *x <= u32::MAX as f64 => {
                Some(*x as usize)
            }
            RecordCount::Float(_) => None,
            RecordCount::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl From<usize> for RecordCount {
    fn from(n: usize) -> Self {
        i64::try_from(n).map_or(RecordCount::Float(n as f64), RecordCount::Number)
    }
}

impl fmt::Display for RecordCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordCount::Number(n) => {
                if *n < 0 {
                    f.write_str("-")?;
                }
                f.write_str(&group_thousands(&n.unsigned_abs().to_string()))
            }
            RecordCount::Float(x) => f.write_str(&format_float(*x)),
            RecordCount::Text(s) => f.write_str(s),
        }
    }
}

// At most three fraction digits, trailing zeros dropped: 1234.5678 -> 1,234.568.
fn format_float(x: f64) -> String {
    if !x.is_finite() {
        return x.to_string();
    }
    let fixed = format!("{:.3}", x.abs());
    let (int, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac.trim_end_matches('0');
    let mut out = String::new();
    if x < 0.0 && (int != "0" || !frac.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_thousands(int));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
