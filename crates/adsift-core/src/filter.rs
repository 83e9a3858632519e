//! Filter facade: decode an advertisement, then decide.
//!
//! The facade wires the extraction pipeline into the two operations the
//! device registry needs: `match_device` against the static rule list, and
//! `train_device`/`should_ignore_device` against the adaptive classifier.
//! It is conservative by default: a device it cannot analyze is never
//! matched and never ignored. None of its operations panic or return
//! errors to the scanning threads that call them.

use tracing::debug;

use crate::advert;
use crate::classifier::{AdaptiveClassifier, IgnoreStats, TrainingLabel};
use crate::config::{FilterConfig, FilterMode};
use crate::data::to_hex;
use crate::pattern::{self, FilterPattern, MatchingPattern};
use crate::storage::TrainingLog;
use crate::types::DeviceContext;

/// Decode-and-decide filter over raw advertisement bytes.
///
/// Mode and compiled rules are fixed at construction; matching touches only
/// that immutable state and is safe for unsynchronized concurrent reads.
/// Mutation funnels through the classifier's critical section.
#[derive(Debug)]
pub struct DeviceFilter {
    mode: FilterMode,
    patterns: Vec<FilterPattern>,
    classifier: AdaptiveClassifier,
}

impl DeviceFilter {
    /// Build a filter from configuration and an optional training-log sink.
    ///
    /// Rules are compiled here, once; invalid rules are skipped with a
    /// diagnostic. In adaptive mode the rule list is not compiled at all:
    /// only one strategy is consulted per deployment.
    #[must_use]
    pub fn new(config: &FilterConfig, log: Option<TrainingLog>) -> Self {
        let patterns = match config.mode {
            FilterMode::StaticRules => pattern::compile_patterns(&config.feature_patterns),
            FilterMode::Adaptive => Vec::new(),
        };
        Self {
            mode: config.mode,
            patterns,
            classifier: AdaptiveClassifier::new(log),
        }
    }

    /// Mode this filter was built with.
    #[must_use]
    pub const fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Match the advertisement's decoded messages against the static rules.
    ///
    /// Returns the first rule (in configuration order) matching any decoded
    /// message, paired with that message's hex text. `None` in adaptive
    /// mode, with no rules configured, or when nothing decodes or matches.
    #[must_use]
    pub fn match_device(&self, raw: &[u8]) -> Option<MatchingPattern<'_>> {
        if self.mode != FilterMode::StaticRules || self.patterns.is_empty() {
            return None;
        }
        for message in self.extract_features(raw) {
            if let Some(matched) = pattern::find_match(&self.patterns, &message) {
                return Some(MatchingPattern {
                    pattern: matched,
                    message,
                });
            }
        }
        None
    }

    /// Feed one operator-labeled advertisement to the adaptive classifier.
    ///
    /// Accepted in either mode, so operators can collect labels before a
    /// deployment switches to adaptive mode. An advertisement that yields
    /// no features trains nothing.
    pub fn train_device(&self, raw: &[u8], device: &DeviceContext, label: TrainingLabel) {
        let features = self.extract_features(raw);
        if features.is_empty() {
            return;
        }
        self.classifier.train(&features, label, &to_hex(raw), device);
    }

    /// Ask the adaptive classifier whether this device should be ignored.
    ///
    /// `false` in static-rules mode, and `false` whenever the advertisement
    /// yields no analyzable features.
    #[must_use]
    pub fn should_ignore_device(&self, raw: &[u8]) -> bool {
        if self.mode != FilterMode::Adaptive {
            return false;
        }
        let features = self.extract_features(raw);
        if features.is_empty() {
            return false;
        }
        self.classifier.should_ignore(&features)
    }

    /// Counter snapshot for one feature signature, for diagnostics.
    #[must_use]
    pub fn feature_stats(&self, feature: &str) -> Option<IgnoreStats> {
        self.classifier.stats(feature)
    }

    /// Run the extraction pipeline and render each message as hex text.
    fn extract_features(&self, raw: &[u8]) -> Vec<String> {
        let segments = advert::extract_manufacturer_data(raw);
        let messages = advert::extract_message_data(&segments.units);
        if segments.skipped > 0 || messages.skipped > 0 {
            debug!(
                segments_skipped = segments.skipped,
                records_skipped = messages.skipped,
                "dropped malformed advertisement units"
            );
        }
        messages.units.iter().map(|message| to_hex(message)).collect()
    }
}
