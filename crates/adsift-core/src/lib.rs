//! # adsift-core
//!
//! Decode-and-decide core for the adsift proximity sensor stack.
//!
//! The radio medium around a receiver is crowded: headphones, trackers, and
//! accessories all broadcast advertisements that can never host the target
//! protocol. This crate decodes the vendor-specific payloads out of raw
//! advertisement bytes and decides, per observed device, whether a
//! connection attempt is worth pursuing.
//!
//! ## Architecture
//!
//! - [`advert`] - manufacturer segment and message record extraction
//! - [`pattern`] - compiled-regex rule matching over hex-rendered messages
//! - [`classifier`] - online ignore/keep statistics trained from labeled
//!   examples
//! - [`filter`] - the facade composing the pipeline into `match`, `train`,
//!   and `should_ignore` operations
//! - [`config`] - construction-time configuration (strategy and rule list)
//! - [`storage`] - append-only training log sink
//! - [`data`] - hex encode/decode helpers
//! - [`error`] - unified error types
//! - [`types`] - shared types
//!
//! The radio-scanning stack, the device registry that tracks lifecycles,
//! and the protocol the surviving devices eventually speak all live
//! elsewhere; this crate only consumes the bytes and metadata they hand
//! over, and it never fails a scanning thread: a device it cannot analyze
//! is simply neither matched nor ignored.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(missing_docs)]

pub mod advert;
pub mod classifier;
pub mod config;
pub mod data;
pub mod error;
pub mod filter;
pub mod pattern;
pub mod storage;
pub mod types;

// Re-export primary types for convenience
pub use advert::{extract_manufacturer_data, extract_message_data, Extraction};
pub use classifier::{AdaptiveClassifier, IgnoreStats, TrainingLabel};
pub use config::{FilterConfig, FilterMode, DEFAULT_FEATURE_PATTERNS};
pub use data::{from_hex, to_hex};
pub use error::{FilterError, Result};
pub use filter::DeviceFilter;
pub use pattern::{compile_patterns, find_match, FilterPattern, MatchingPattern};
pub use storage::{TrainingLog, TRAINING_LOG_HEADER};
pub use types::DeviceContext;
