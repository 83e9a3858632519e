//! Shared types consumed and produced by the filter facade.

use serde::{Deserialize, Serialize};

/// Metadata the scanning subsystem hands over alongside an observed
/// device's advertisement bytes.
///
/// Everything beyond the identifier is optional; the radio stack does not
/// always know it. The filter only echoes these fields into training-log
/// rows, it never bases a verdict on them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceContext {
    /// Opaque device identifier assigned by the radio stack.
    pub identifier: String,

    /// Signal strength of the observation in dBm, when measured.
    pub rssi: Option<i16>,

    /// Device model, when known.
    pub model: Option<String>,

    /// Advertised device name, when known.
    pub name: Option<String>,
}

impl DeviceContext {
    /// Context carrying only an identifier.
    #[must_use]
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Self::default()
        }
    }
}
