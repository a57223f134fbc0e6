//! Settings for alternative critical damage.

use ac_mechanics::capture::{DEFAULT_CAPACITY, DEFAULT_TTL_MS};
use ac_mechanics::{DoublingScope, SynthOptions};
use serde::{Deserialize, Serialize};

/// User-facing settings, read from the host on every invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AltCritSettings {
    /// Whether the feature is active at all.
    pub enabled: bool,
    /// Whether static modifiers are doubled on a critical hit.
    pub double_static_modifiers: bool,
    /// Which static modifiers doubling reaches.
    pub doubling_scope: DoublingScope,
    /// Capture freshness window in milliseconds.
    pub capture_ttl_ms: i64,
    /// Number of items whose captures are kept at once.
    pub capture_capacity: usize,
}

impl Default for AltCritSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            double_static_modifiers: false,
            doubling_scope: DoublingScope::FlatParts,
            capture_ttl_ms: DEFAULT_TTL_MS,
            capture_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl AltCritSettings {
    /// Enable or disable the feature.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Enable or disable static-modifier doubling.
    pub fn with_double_static(mut self, double_static: bool) -> Self {
        self.double_static_modifiers = double_static;
        self
    }

    /// Set the doubling scope.
    pub fn with_doubling_scope(mut self, scope: DoublingScope) -> Self {
        self.doubling_scope = scope;
        self
    }

    /// Set the capture freshness window (negative values become zero).
    pub fn with_capture_ttl_ms(mut self, ttl_ms: i64) -> Self {
        self.capture_ttl_ms = ttl_ms.max(0);
        self
    }

    /// Set the capture capacity (at least one).
    pub fn with_capture_capacity(mut self, capacity: usize) -> Self {
        self.capture_capacity = capacity.max(1);
        self
    }

    /// Synthesis options for one roll.
    pub fn synth_options(&self, critical: bool) -> SynthOptions {
        SynthOptions {
            critical,
            double_static: self.double_static_modifiers,
            scope: self.doubling_scope,
        }
    }
}
