//! Sequential, fixed-width, prefixed ID generation.
//!
//! An ID is `prefix` followed by a zero-padded number, `total_length`
//! characters in all.

use crate::error::IdError;
use std::collections::HashSet;

/// Width of the numeric part, and the largest number that fits in it.
///
/// `None` for the maximum means the field is wider than 128-bit arithmetic
/// and therefore cannot overflow.
fn numeric_field(prefix: &str, total_length: usize) -> Result<(usize, Option<i128>), IdError> {
    let prefix_len = prefix.chars().count();
    if prefix_len >= total_length {
        return Err(IdError::PrefixTooLong {
            prefix_len,
            total_length,
        });
    }
    let digits = total_length - prefix_len;
    let max = u32::try_from(digits)
        .ok()
        .and_then(|d| 10_i128.checked_pow(d))
        .map(|p| p - 1);
    Ok((digits, max))
}

/// Check that `count` IDs starting at `start_number` fit the configured width.
pub fn validate_id_config(
    prefix: &str,
    total_length: usize,
    start_number: i64,
    count: usize,
) -> Result<(), IdError> {
    let (digits, max) = numeric_field(prefix, total_length)?;

    if start_number < 0 {
        return Err(IdError::NegativeStart {
            start: start_number,
        });
    }

    if let Some(max) = max {
        let highest = i128::from(start_number) + count as i128 - 1;
        if highest > max {
            return Err(IdError::Overflow {
                count,
                start: start_number,
                digits,
                max,
            });
        }
    }

    Ok(())
}

/// Generate `count` IDs, one per data row in order.
///
/// ```
/// use sheetql_core::ids::generate_ids;
///
/// let ids = generate_ids("ID-", 10, 1, 3).unwrap();
/// assert_eq!(ids, vec!["ID-0000001", "ID-0000002", "ID-0000003"]);
/// ```
pub fn generate_ids(
    prefix: &str,
    total_length: usize,
    start_number: i64,
    count: usize,
) -> Result<Vec<String>, IdError> {
    validate_id_config(prefix, total_length, start_number, count)?;
    let (width, _) = numeric_field(prefix, total_length)?;

    let mut ids = Vec::with_capacity(count);
    let mut seen = HashSet::with_capacity(count);

    for offset in 0..count {
        let digits = (i128::from(start_number) + offset as i128).to_string();
        let mut id = String::with_capacity(prefix.len() + width);
        id.push_str(prefix);
        id.push_str(&"0".repeat(width.saturating_sub(digits.len())));
        id.push_str(&digits);
        if !seen.insert(id.clone()) {
            return Err(IdError::DuplicateId(id));
        }
        ids.push(id);
    }

    tracing::debug!(count, prefix, width, "generated ids");
    Ok(ids)
}
