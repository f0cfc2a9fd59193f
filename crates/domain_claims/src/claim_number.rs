//! Claim number generation

use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

/// Generates a human-readable claim reference.
///
/// Format: `CLM-` plus the last six digits of the epoch milliseconds plus a
/// zero-padded three-digit random suffix, e.g. `CLM-482917-063`. Invoked
/// once per claim at creation and stored verbatim. Not collision-free by
/// construction; the storage layer enforces uniqueness and the caller
/// regenerates on conflict.
pub fn generate() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1000);
    format!("CLM-{:06}-{:03}", millis % 1_000_000, suffix)
}

/// True when the string has the shape produced by [`generate`]
pub fn matches_format(candidate: &str) -> bool {
    let mut parts = candidate.split('-');
    matches!(
        (parts.next(), parts.next(), parts.next(), parts.next()),
        (Some("CLM"), Some(stamp), Some(suffix), None)
            if stamp.len() == 6
                && suffix.len() == 3
                && stamp.chars().all(|c| c.is_ascii_digit())
                && suffix.chars().all(|c| c.is_ascii_digit())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_number_matches_format() {
        for _ in 0..50 {
            let number = generate();
            assert!(matches_format(&number), "bad claim number: {number}");
        }
    }

    #[test]
    fn test_format_checker_rejects_other_shapes() {
        assert!(matches_format("CLM-123456-007"));
        assert!(!matches_format("CLM-12345-007"));
        assert!(!matches_format("CLM-123456-07"));
        assert!(!matches_format("POL-123456-007"));
        assert!(!matches_format("CLM-123456-007-extra"));
        assert!(!matches_format("CLM-12a456-007"));
    }
}
