//! List rules command implementation.

use archgate_core::RuleKind;

/// Renders the rule catalogue.
pub fn render() -> String {
    use std::fmt::Write;

    let mut out = String::from("Available rules:\n\n");
    let _ = writeln!(out, "{:<24} Description", "Kind");
    let _ = writeln!(out, "{}", "-".repeat(80));
    for kind in RuleKind::ALL {
        let _ = writeln!(out, "{:<24} {}", kind.name(), kind.description());
    }
    out.push_str("\nConfigure rules as [[rules]] entries keyed by `kind`, e.g.:\n");
    out.push_str("  [[rules]]\n  kind = \"forbidden-layer-import\"\n  from = \"domain\"\n  to = \"infra\"\n");
    out
}

/// Runs the list-rules command.
pub fn run() {
    print!("{}", render());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_kind() {
        let out = render();
        for kind in RuleKind::ALL {
            assert!(out.contains(kind.name()), "missing {kind}");
        }
    }
}
