//! Derivation of the human-readable payment identifier.
//!
//! Identifiers look like "KIT/001": the first three letters of the crew,
//! upper-cased, then a zero-padded sequence scoped to the
//! `(crew, outreach)` partition.

pub const DEFAULT_CREW: &str = "nocrew";

/// First three characters of the crew name, upper-cased.
pub fn crew_prefix(crew: &str) -> String {
    crew.chars().take(3).collect::<String>().to_uppercase()
}

/// Numeric suffix of an existing identifier, if it parses.
pub fn sequence_of(id: &str) -> Option<u32> {
    id.rsplit('/').next()?.parse().ok()
}

pub fn format_id(prefix: &str, sequence: u32) -> String {
    format!("{}/{:03}", prefix, sequence)
}

/// Next sequence number after the most recent id in a partition, plus a flag
/// set when that id's suffix did not parse and the sequence restarted at 1.
/// Restarted rows are logged for manual review by the caller.
pub fn next_sequence(last_id: Option<&str>) -> (u32, bool) {
    match last_id {
        None => (1, false),
        Some(last) => match sequence_of(last) {
            Some(seq) => (seq + 1, false),
            None => (1, true),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_is_first_three_letters_uppercased() {
        assert_eq!(crew_prefix("kitchen"), "KIT");
        assert_eq!(crew_prefix("nocrew"), "NOC");
        assert_eq!(crew_prefix("av"), "AV");
    }

    #[test]
    fn sequence_parses_the_numeric_suffix() {
        assert_eq!(sequence_of("KIT/007"), Some(7));
        assert_eq!(sequence_of("NOC/120"), Some(120));
        assert_eq!(sequence_of("KIT/garbage"), None);
    }

    #[test]
    fn format_pads_to_three_digits() {
        assert_eq!(format_id("KIT", 1), "KIT/001");
        assert_eq!(format_id("KIT", 42), "KIT/042");
        assert_eq!(format_id("KIT", 1000), "KIT/1000");
    }

    #[test]
    fn empty_partition_starts_at_one() {
        assert_eq!(next_sequence(None), (1, false));
    }

    #[test]
    fn sequence_increments_from_the_last_id() {
        assert_eq!(next_sequence(Some("KIT/009")), (10, false));
    }

    #[test]
    fn unparseable_suffix_restarts_and_flags() {
        assert_eq!(next_sequence(Some("KIT/none")), (1, true));
    }
}
