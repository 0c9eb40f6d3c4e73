//! Spoken-language parsing helpers
//!
//! Small deterministic extractors for the numeric fragments of an
//! utterance. Anything ambiguous is "not detected", never an error - the
//! orchestrator re-prompts instead.

/// Extract the first spoken amount from an utterance
///
/// Accepts `.` or `,` as the decimal separator ("50", "50,50", "50.50").
/// No digits, or a non-positive value, yields `None` - "no amount
/// detected" is not the same as an amount of zero.
pub fn extract_amount(text: &str) -> Option<f64> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = compact.as_bytes();

    let start = bytes.iter().position(|b| b.is_ascii_digit())?;

    let mut token = String::new();
    let mut seen_separator = false;
    for &b in &bytes[start..] {
        let c = b as char;
        if c.is_ascii_digit() {
            token.push(c);
        } else if (c == '.' || c == ',') && !seen_separator {
            // Separator counts only when digits follow it
            seen_separator = true;
            token.push('.');
        } else {
            break;
        }
    }
    let token = token.trim_end_matches('.');

    let value: f64 = token.parse().ok()?;
    if value > 0.0 {
        Some(value)
    } else {
        None
    }
}

/// Extract how many past transfers the caller asked for
///
/// First integer in the utterance, clamped to `max`; `default` when absent
/// or non-positive.
pub fn extract_history_limit(text: &str, default: usize, max: usize) -> usize {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return default;
    }

    // Absurdly long numbers overflow the parse; treat them as "a lot".
    let n = digits.parse::<u64>().unwrap_or(u64::MAX);
    if n == 0 {
        return default;
    }
    (n as usize).min(max)
}

/// All decimal digits of an utterance, in order (authentication helper)
pub fn extract_digits(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_formats() {
        assert_eq!(extract_amount("50"), Some(50.0));
        assert_eq!(extract_amount("50,50"), Some(50.5));
        assert_eq!(extract_amount("50.50"), Some(50.5));
        assert_eq!(extract_amount("send 120 to mom"), Some(120.0));
        assert_eq!(extract_amount("send 1 200,50 zloty"), Some(1200.5));
    }

    #[test]
    fn test_amount_not_detected() {
        assert_eq!(extract_amount("send money to mom"), None);
        assert_eq!(extract_amount(""), None);
        assert_eq!(extract_amount("send 0 to mom"), None);
    }

    #[test]
    fn test_amount_trailing_separator() {
        assert_eq!(extract_amount("50, please"), Some(50.0));
        assert_eq!(extract_amount("50."), Some(50.0));
    }

    #[test]
    fn test_history_limit() {
        assert_eq!(extract_history_limit("show 5 transfers", 3, 10), 5);
        assert_eq!(extract_history_limit("show history", 3, 10), 3);
        assert_eq!(extract_history_limit("show 99", 3, 10), 10);
        assert_eq!(extract_history_limit("show 0 transfers", 3, 10), 3);
        assert_eq!(
            extract_history_limit("show 99999999999999999999 transfers", 3, 10),
            10
        );
    }

    #[test]
    fn test_extract_digits() {
        assert_eq!(extract_digits("one two 1 2 3 4"), "1234");
        assert_eq!(extract_digits("no digits here"), "");
    }
}
