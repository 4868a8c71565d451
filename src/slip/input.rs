use crate::scoring::{COUNT_MAX, COUNT_MIN};

/// Clamp a raw count into `[COUNT_MIN, COUNT_MAX]`.
pub fn clamp_count(value: i64) -> u32 {
    // Both bounds fit in u32, so the cast after clamping is lossless.
    value.clamp(i64::from(COUNT_MIN), i64::from(COUNT_MAX)) as u32
}

/// Keep only ASCII digits, as a count field does while typing.
pub fn strip_non_digits(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Turn whatever was typed into a count field into a valid count.
///
/// Non-digits are dropped, empty input is 0, and anything past `COUNT_MAX`
/// (including digit strings too long to parse) saturates to `COUNT_MAX`.
pub fn sanitize_count_text(text: &str) -> u32 {
    let digits = strip_non_digits(text);
    if digits.is_empty() {
        return COUNT_MIN;
    }
    match digits.parse::<i64>() {
        Ok(value) => clamp_count(value),
        Err(_) => COUNT_MAX,
    }
}
