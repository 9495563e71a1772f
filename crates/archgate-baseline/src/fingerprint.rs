//! Stable violation fingerprints.

use archgate_core::Violation;
use sha2::{Digest, Sha256};

/// Number of hex characters kept from the SHA-256 digest.
pub const FINGERPRINT_LEN: usize = 16;

/// Fingerprint of a violation: rule id, file and position.
///
/// The message is not part of the fingerprint, so rewording a rule keeps
/// existing baseline entries. Positions must match exactly; a violation that
/// moves to another line is a new violation.
#[must_use]
pub fn fingerprint(violation: &Violation) -> String {
    let position = match (&violation.range, violation.line) {
        (Some(r), _) => format!(
            "{}:{}-{}:{}",
            r.start.line, r.start.column, r.end.line, r.end.column
        ),
        (None, Some(line)) => line.to_string(),
        (None, None) => String::new(),
    };

    let mut hasher = Sha256::new();
    for part in [violation.rule_id.as_str(), violation.file.as_str(), position.as_str()] {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    let mut hex = format!("{:x}", hasher.finalize());
    hex.truncate(FINGERPRINT_LEN);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;
    use archgate_core::{Position, Severity, SourceRange};

    fn violation(message: &str) -> Violation {
        Violation::new("forbidden-layer-import", Severity::Error, "src/domain/a.ts", message)
            .with_range(SourceRange::new(Position::new(3, 1), Position::new(3, 30)))
    }

    #[test]
    fn ignores_message() {
        assert_eq!(fingerprint(&violation("one")), fingerprint(&violation("two")));
    }

    #[test]
    fn changes_with_position() {
        let moved = violation("one").with_range(SourceRange::line(4));
        assert_ne!(fingerprint(&violation("one")), fingerprint(&moved));
    }

    #[test]
    fn changes_with_rule_and_file() {
        let base = violation("m");
        let mut other_rule = base.clone();
        other_rule.rule_id = "cyclic-dependency".into();
        let mut other_file = base.clone();
        other_file.file = "src/domain/b.ts".into();
        assert_ne!(fingerprint(&base), fingerprint(&other_rule));
        assert_ne!(fingerprint(&base), fingerprint(&other_file));
    }

    #[test]
    fn known_value() {
        insta::assert_snapshot!(fingerprint(&violation("m")), @"9ef91af0d2460d8f");
    }

    #[test]
    fn is_short_hex() {
        let fp = fingerprint(&Violation::new("r", Severity::Info, "f", "m"));
        assert_eq!(fp.len(), FINGERPRINT_LEN);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
