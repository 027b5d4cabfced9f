use std::fmt;

/// Amounts are plain decimals. Per-person shares are `amount / group size`, so
/// they can drift from the original amount by floating rounding; nothing corrects it.
pub type Amount = f64;

/// Tolerance used when deciding whether a running balance is exhausted.
pub const EPSILON: Amount = 1e-9;

/// Balances closer to zero than this are displayed as settled.
pub const SETTLED_THRESHOLD: Amount = 0.01;

/// Format an amount with exactly two decimal places.
/// Example: 50.0 -> "50.00", -16.666 -> "-16.67", -0.001 -> "0.00"
pub fn format_amount(amount: Amount) -> String {
    let formatted = format!("{:.2}", amount);
    // Tiny negative residues would otherwise render as "-0.00"
    if formatted == "-0.00" {
        return "0.00".to_string();
    }
    formatted
}

/// Parse a non-negative decimal literal: digits, optionally followed by a dot and digits.
/// Example: "50" -> 50.0, "12.5" -> 12.5. Signs, exponents and bare dots are rejected.
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let input = input.trim();
    let (units, decimals) = match input.split_once('.') {
        Some((units, decimals)) => (units, Some(decimals)),
        None => (input, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(units) || decimals.is_some_and(|d| !all_digits(d)) {
        return Err(ParseAmountError::InvalidFormat);
    }

    input
        .parse::<Amount>()
        .map_err(|_| ParseAmountError::InvalidFormat)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => write!(f, "invalid amount format"),
        }
    }
}

impl std::error::Error for ParseAmountError {}
