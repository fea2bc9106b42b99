//! Sequential document numbering
//!
//! Invoices, bills and similar documents carry human-readable numbers such as
//! `INV-000042`. The next number is derived from the highest number issued so
//! far, which the caller passes in explicitly.

/// Width of the zero-padded sequence part
const SEQUENCE_WIDTH: usize = 6;

/// Returns the next document number for a prefix
///
/// # Arguments
///
/// * `prefix` - Document family prefix (e.g., "INV", "B")
/// * `last_number` - The highest number issued so far, if any
///
/// A `last_number` that does not match the `{prefix}-{digits}` shape is
/// treated as absent, restarting the sequence.
pub fn next_number(prefix: &str, last_number: Option<&str>) -> String {
    let last_sequence = last_number
        .and_then(|number| number.strip_prefix(prefix))
        .and_then(|rest| rest.strip_prefix('-'))
        .and_then(|digits| digits.parse::<u64>().ok())
        .unwrap_or(0);

    format!(
        "{}-{:0width$}",
        prefix,
        last_sequence + 1,
        width = SEQUENCE_WIDTH
    )
}
