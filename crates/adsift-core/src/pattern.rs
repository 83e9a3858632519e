//! Compiled-rule matching over hex-rendered message records.
//!
//! Rules are regular expressions matched case-insensitively against the
//! uppercase hex text of each decoded message. By convention a rule uses
//! `.` to mean "any hex nibble, don't care", e.g. `^10....04` accepts any
//! two bytes between the `10` subtype and the `04` flag.

use regex::{Regex, RegexBuilder};
use tracing::warn;

/// A filter rule: the source text and its compiled expression.
///
/// Built once at filter construction and never mutated; safe to share
/// read-only across matching threads.
#[derive(Debug, Clone)]
pub struct FilterPattern {
    /// Rule text exactly as configured.
    pub rule: String,
    /// Compiled case-insensitive expression.
    pub regex: Regex,
}

/// A rule paired with the message text that satisfied it.
#[derive(Debug, Clone)]
pub struct MatchingPattern<'a> {
    /// The rule that matched.
    pub pattern: &'a FilterPattern,
    /// Hex text of the message that matched.
    pub message: String,
}

/// Compile rule strings into [`FilterPattern`]s, preserving order.
///
/// A rule that fails to compile is skipped with a diagnostic; the remaining
/// rules still compile. Order is significant downstream (first match wins),
/// so the output keeps configuration order minus the skipped rules.
pub fn compile_patterns<S: AsRef<str>>(rules: &[S]) -> Vec<FilterPattern> {
    let mut patterns = Vec::with_capacity(rules.len());
    for rule in rules {
        let rule = rule.as_ref();
        match RegexBuilder::new(rule).case_insensitive(true).build() {
            Ok(regex) => patterns.push(FilterPattern {
                rule: rule.to_string(),
                regex,
            }),
            Err(error) => {
                warn!(rule, %error, "skipping invalid filter pattern");
            }
        }
    }
    patterns
}

/// Return the first pattern whose expression finds a match anywhere in
/// `message`, or `None`.
///
/// Matching is unanchored; rules anchor themselves with `^`/`$` when they
/// need to. Empty text never matches, whatever the rules say.
#[must_use]
pub fn find_match<'a>(patterns: &'a [FilterPattern], message: &str) -> Option<&'a FilterPattern> {
    if message.is_empty() {
        return None;
    }
    patterns.iter().find(|pattern| pattern.regex.is_match(message))
}
