//! Online ignore/keep classifier trained from operator-labeled examples.
//!
//! Every message record decoded from an advertisement is rendered to hex
//! text (its feature signature) and keyed into a counters map. Operators
//! label observed devices as "ignore" or "keep"; the counters accumulate
//! for the lifetime of the process and are never evicted, so callers bound
//! memory by bounding the diversity of advertisements they feed in.
//!
//! The decision policy is deliberately asymmetric: a single "keep"
//! observation vetoes ignoring a signature forever, while "ignore" needs
//! more than two observations to take effect. Which label arrives first for
//! a conflicted signature therefore decides the outcome. Downstream
//! deployments are calibrated against exactly this behavior; do not
//! rebalance or average the counts.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::{Mutex, PoisonError, RwLock};

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use crate::storage::TrainingLog;
use crate::types::DeviceContext;

/// Operator-assigned label for a training example.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingLabel {
    /// The device cannot host the target protocol; teach the classifier to
    /// auto-ignore advertisements that look like it.
    Ignore,
    /// The device is (or might be) legitimate; one such observation vetoes
    /// auto-ignoring its signatures.
    Keep,
}

impl TrainingLabel {
    /// Single-character form used in training-log rows.
    #[must_use]
    pub const fn flag(self) -> char {
        match self {
            Self::Ignore => 'Y',
            Self::Keep => 'N',
        }
    }
}

/// Per-signature observation counters.
///
/// Monotonically non-decreasing; no operation reduces a count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IgnoreStats {
    /// Observations labeled [`TrainingLabel::Ignore`].
    pub ignore_count: u64,
    /// Observations labeled [`TrainingLabel::Keep`].
    pub keep_count: u64,
}

/// Signature-keyed classifier with an optional append-only training log.
///
/// Shared across scanning threads. Training holds the log guard plus the
/// write half of the counters lock for the whole operation, so concurrent
/// training calls can neither lose increments nor interleave log rows.
/// Ignore lookups take only the read half and may briefly lag a concurrent
/// trainer.
#[derive(Debug)]
pub struct AdaptiveClassifier {
    samples: RwLock<HashMap<String, IgnoreStats>>,
    log: Mutex<Option<TrainingLog>>,
}

impl AdaptiveClassifier {
    /// New classifier with empty counters and an optional log sink.
    #[must_use]
    pub fn new(log: Option<TrainingLog>) -> Self {
        Self {
            samples: RwLock::new(HashMap::new()),
            log: Mutex::new(log),
        }
    }

    /// Record one labeled advertisement.
    ///
    /// Each feature signature gets its counters entry created on first
    /// observation and the labeled count incremented, then one log row when
    /// a sink is configured. A sink failure is reported and swallowed;
    /// counter updates always complete.
    pub fn train(
        &self,
        features: &[String],
        label: TrainingLabel,
        raw_hex: &str,
        device: &DeviceContext,
    ) {
        let mut log = self.log.lock().unwrap_or_else(PoisonError::into_inner);
        let mut samples = self.samples.write().unwrap_or_else(PoisonError::into_inner);
        let now = Local::now();
        for feature in features {
            let stats = samples.entry(feature.clone()).or_default();
            match label {
                TrainingLabel::Ignore => stats.ignore_count += 1,
                TrainingLabel::Keep => stats.keep_count += 1,
            }
            debug!(
                label = %label.flag(),
                feature = feature.as_str(),
                raw = raw_hex,
                device = device.identifier.as_str(),
                "train"
            );
            if let Some(log) = log.as_mut() {
                let row = training_row(now, label, feature, raw_hex, device);
                if let Err(error) = log.append(&row) {
                    warn!(%error, path = %log.path().display(), "failed to append training row");
                }
            }
        }
    }

    /// Decide whether a device with these feature signatures should be
    /// ignored, evaluating signatures in extraction order.
    ///
    /// Short-circuit policy, preserved exactly:
    /// - a signature never seen in training decides `false` immediately;
    /// - a signature with any "keep" observation decides `false`
    ///   immediately, regardless of its ignore count;
    /// - a signature with strictly more than two "ignore" observations
    ///   decides `true` immediately;
    /// - otherwise the next signature is consulted, and `false` is the
    ///   default when none decides.
    #[must_use]
    pub fn should_ignore(&self, features: &[String]) -> bool {
        let samples = self.samples.read().unwrap_or_else(PoisonError::into_inner);
        for feature in features {
            let Some(stats) = samples.get(feature) else {
                return false;
            };
            if stats.keep_count > 0 {
                return false;
            }
            if stats.ignore_count > 2 {
                return true;
            }
        }
        false
    }

    /// Counter snapshot for one signature, if it has ever been observed.
    #[must_use]
    pub fn stats(&self, feature: &str) -> Option<IgnoreStats> {
        self.samples
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(feature)
            .copied()
    }
}

/// Render one training-log data row.
///
/// Field order matches the sink header: quoted timestamp, label flag,
/// feature hex, raw advertisement hex, identifier, then rssi, quoted model,
/// and quoted name, each left empty when absent.
fn training_row(
    at: DateTime<Local>,
    label: TrainingLabel,
    feature_hex: &str,
    raw_hex: &str,
    device: &DeviceContext,
) -> String {
    let mut row = format!(
        "\"{}\",{},{},{},{},",
        at.format("%Y-%m-%d %H:%M:%S"),
        label.flag(),
        feature_hex,
        raw_hex,
        device.identifier,
    );
    if let Some(rssi) = device.rssi {
        let _ = write!(row, "{rssi}");
    }
    row.push(',');
    if let Some(model) = &device.model {
        let _ = write!(row, "\"{model}\"");
    }
    row.push(',');
    if let Some(name) = &device.name {
        let _ = write!(row, "\"{name}\"");
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn features(signatures: &[&str]) -> Vec<String> {
        signatures.iter().map(|s| (*s).to_string()).collect()
    }

    fn train_n(classifier: &AdaptiveClassifier, signature: &str, label: TrainingLabel, n: usize) {
        let features = features(&[signature]);
        let device = DeviceContext::new("device-under-test");
        for _ in 0..n {
            classifier.train(&features, label, "02011A", &device);
        }
    }

    #[test]
    fn test_unknown_signature_is_never_ignored() {
        let classifier = AdaptiveClassifier::new(None);
        assert!(!classifier.should_ignore(&features(&["10060C044FDE4DF7"])));
    }

    #[test]
    fn test_three_ignore_observations_trigger_ignore() {
        let classifier = AdaptiveClassifier::new(None);
        train_n(&classifier, "100101", TrainingLabel::Ignore, 2);
        // Strictly more than two observations required.
        assert!(!classifier.should_ignore(&features(&["100101"])));

        train_n(&classifier, "100101", TrainingLabel::Ignore, 1);
        assert!(classifier.should_ignore(&features(&["100101"])));
    }

    #[test]
    fn test_keep_observation_vetoes_even_after_ignore_training() {
        let classifier = AdaptiveClassifier::new(None);
        train_n(&classifier, "100101", TrainingLabel::Ignore, 3);
        assert!(classifier.should_ignore(&features(&["100101"])));

        train_n(&classifier, "100101", TrainingLabel::Keep, 1);
        assert!(!classifier.should_ignore(&features(&["100101"])));

        // More ignore observations cannot override the veto.
        train_n(&classifier, "100101", TrainingLabel::Ignore, 10);
        assert!(!classifier.should_ignore(&features(&["100101"])));
    }

    #[test]
    fn test_first_unknown_signature_short_circuits() {
        let classifier = AdaptiveClassifier::new(None);
        train_n(&classifier, "100101", TrainingLabel::Ignore, 5);

        // Unknown signature first: decided false before the trained one is
        // consulted.
        assert!(!classifier.should_ignore(&features(&["FFFF", "100101"])));
        // Trained signature first: decided true.
        assert!(classifier.should_ignore(&features(&["100101", "FFFF"])));
    }

    #[test]
    fn test_undecided_signature_falls_through_to_next() {
        let classifier = AdaptiveClassifier::new(None);
        train_n(&classifier, "AAAA", TrainingLabel::Ignore, 1);
        train_n(&classifier, "BBBB", TrainingLabel::Ignore, 3);

        // AAAA is known but undecided (one ignore, no keep): evaluation
        // continues to BBBB, which decides.
        assert!(classifier.should_ignore(&features(&["AAAA", "BBBB"])));
    }

    #[test]
    fn test_counters_increment_per_occurrence() {
        let classifier = AdaptiveClassifier::new(None);
        let device = DeviceContext::new("device-under-test");

        classifier.train(
            &features(&["100101", "100101"]),
            TrainingLabel::Ignore,
            "02011A",
            &device,
        );
        assert_eq!(
            classifier.stats("100101"),
            Some(IgnoreStats {
                ignore_count: 2,
                keep_count: 0
            })
        );

        classifier.train(&features(&["100101"]), TrainingLabel::Keep, "02011A", &device);
        assert_eq!(
            classifier.stats("100101"),
            Some(IgnoreStats {
                ignore_count: 2,
                keep_count: 1
            })
        );
    }

    #[test]
    fn test_training_rows_reach_the_sink() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training.csv");
        let classifier = AdaptiveClassifier::new(Some(TrainingLog::create(&path).unwrap()));

        let device = DeviceContext {
            identifier: "AA:BB:CC:DD:EE:FF".into(),
            rssi: Some(-67),
            model: Some("MacBookPro16,1".into()),
            name: Some("Kitchen Laptop".into()),
        };
        classifier.train(
            &features(&["1005031C0B4CAC"]),
            TrainingLabel::Ignore,
            "02011A0AFF4C001005031C0B4CAC",
            &device,
        );

        let content = std::fs::read_to_string(&path).unwrap();
        let rows: Vec<&str> = content.lines().collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[1].contains(",Y,1005031C0B4CAC,02011A0AFF4C001005031C0B4CAC,"));
        assert!(rows[1].ends_with("AA:BB:CC:DD:EE:FF,-67,\"MacBookPro16,1\",\"Kitchen Laptop\""));
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn test_sink_failure_does_not_abort_counter_updates() {
        // /dev/full accepts the open and fails every write with ENOSPC.
        let file = std::fs::OpenOptions::new()
            .append(true)
            .open("/dev/full")
            .unwrap();
        let log = TrainingLog::from_parts(std::path::PathBuf::from("/dev/full"), file);
        let classifier = AdaptiveClassifier::new(Some(log));

        train_n(&classifier, "100101", TrainingLabel::Ignore, 3);

        assert_eq!(
            classifier.stats("100101"),
            Some(IgnoreStats {
                ignore_count: 3,
                keep_count: 0
            })
        );
        assert!(classifier.should_ignore(&features(&["100101"])));
    }

    #[test]
    fn test_row_format_with_all_fields() {
        let at = Local.with_ymd_and_hms(2021, 3, 14, 15, 9, 2).unwrap();
        let device = DeviceContext {
            identifier: "AA:BB".into(),
            rssi: Some(-42),
            model: Some("AppleTV5,3".into()),
            name: Some("Den".into()),
        };
        let row = training_row(at, TrainingLabel::Ignore, "100101", "02011A", &device);
        assert_eq!(
            row,
            "\"2021-03-14 15:09:02\",Y,100101,02011A,AA:BB,-42,\"AppleTV5,3\",\"Den\""
        );
    }

    #[test]
    fn test_row_format_with_absent_optionals() {
        let at = Local.with_ymd_and_hms(2021, 3, 14, 15, 9, 2).unwrap();
        let device = DeviceContext::new("AA:BB");
        let row = training_row(at, TrainingLabel::Keep, "100101", "02011A", &device);
        assert_eq!(row, "\"2021-03-14 15:09:02\",N,100101,02011A,AA:BB,,,");
    }

    #[test]
    fn test_classifier_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<AdaptiveClassifier>();
        assert_sync::<AdaptiveClassifier>();
    }
}
