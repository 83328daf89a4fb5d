use thiserror::Error;

/// Currency prefix tokens recognized (and stripped) at the front of a
/// submitted amount. At most one, matched case-insensitively.
const CURRENCY_PREFIXES: &[&str] = &["Rp", "IDR", "USD", "EUR", "GBP", "$", "€", "£"];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("amount contains invalid character '{0}'")]
    InvalidCharacter(char),

    #[error("amount has malformed digit grouping")]
    BadGrouping,

    #[error("amount is out of range")]
    OutOfRange,
}

/// Parse a human-formatted amount string into integer minor currency units.
///
/// Accepts an optional currency prefix, surrounding whitespace, and grouping
/// separators (`.` or `,`). Grouping has to be structurally valid: the first
/// group is 1-3 digits and every later group exactly 3, so `"Rp 1.234.567"`
/// yields `1234567` while `"12.50"` is rejected rather than silently read as
/// `1250`. A malformed amount must never become zero.
pub fn parse_minor_units(raw: &str) -> Result<i64, AmountError> {
    let mut rest = raw.trim();
    for prefix in CURRENCY_PREFIXES {
        if let Some(head) = rest.get(..prefix.len()) {
            if head.eq_ignore_ascii_case(prefix) {
                rest = rest[prefix.len()..].trim_start();
                break;
            }
        }
    }
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(AmountError::Empty);
    }

    let digits = match rest.chars().find(|c| matches!(c, '.' | ',')) {
        Some(sep) => {
            let mut digits = String::with_capacity(rest.len());
            for (i, group) in rest.split(sep).enumerate() {
                let len_ok = if i == 0 {
                    (1..=3).contains(&group.len())
                } else {
                    group.len() == 3
                };
                if !len_ok {
                    return Err(AmountError::BadGrouping);
                }
                if let Some(c) = group.chars().find(|c| !c.is_ascii_digit()) {
                    return Err(AmountError::InvalidCharacter(c));
                }
                digits.push_str(group);
            }
            digits
        }
        None => {
            if let Some(c) = rest.chars().find(|c| !c.is_ascii_digit()) {
                return Err(AmountError::InvalidCharacter(c));
            }
            rest.to_string()
        }
    };

    digits.parse::<i64>().map_err(|_| AmountError::OutOfRange)
}

/// Render stored minor units back into the display form used on receipts.
pub fn format_minor_units(amount: i64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 3);
    out.push_str("Rp ");
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
