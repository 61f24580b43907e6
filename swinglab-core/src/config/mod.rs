//! Swing configuration: base defaults, named presets, caller overrides.
//!
//! Resolution is a shallow three-tier merge, later wins:
//! base defaults -> preset deltas -> caller overrides.
//! The result is validated once and then treated as immutable.

pub mod overrides;
pub mod preset;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::EntryMode;

pub use overrides::ConfigOverrides;
pub use preset::Preset;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown preset '{0}' (expected manual, aggressive, balanced, conservative or debug)")]
    UnknownPreset(String),

    #[error("invalid value for {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("malformed override payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed config file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Fully resolved threshold and flag set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingConfig {
    /// Preset this configuration was resolved from.
    pub preset: Preset,

    pub rsi_min: f64,
    pub rsi_max: f64,
    pub rel_vol_min: f64,
    /// Stop distance below entry, in ATRs.
    pub atr_mult: f64,
    /// Maximum percent above the 50-day average.
    pub max_stretch_pct: f64,
    /// Band (percent, either side) that counts as "near" the 50-day average.
    pub near_pct50: f64,
    pub entry_mode: EntryMode,

    pub require_price_above_50: bool,
    pub require_trend_aligned: bool,
    pub require_entry_gate: bool,
    pub allow_repeat_entries: bool,
    /// Carried for compatibility; suppression is a one-bar look-back, not an
    /// N-bar window.
    pub cooldown_bars: u32,

    // Reserved: declared and resolved, no filter registered for them yet.
    pub require_macd_above_0: bool,
    pub use_mtf_confirm: bool,
    pub use_base_tightness: bool,
    pub use_candle_quality: bool,
    pub use_gap_guard: bool,
    pub bb_len: u32,
    pub bb_mult: f64,
}

impl SwingConfig {
    /// Base defaults, tagged with `preset` but without its deltas applied.
    pub fn base(preset: Preset) -> Self {
        Self {
            preset,
            rsi_min: 45.0,
            rsi_max: 60.0,
            rel_vol_min: 1.8,
            atr_mult: 1.5,
            max_stretch_pct: 10.0,
            near_pct50: 8.0,
            entry_mode: EntryMode::Pullback,
            require_price_above_50: true,
            require_trend_aligned: true,
            require_entry_gate: true,
            allow_repeat_entries: false,
            cooldown_bars: 5,
            require_macd_above_0: true,
            use_mtf_confirm: true,
            use_base_tightness: true,
            use_candle_quality: true,
            use_gap_guard: true,
            bb_len: 20,
            bb_mult: 2.0,
        }
    }

    /// Resolve `preset` plus optional caller overrides into a validated config.
    pub fn resolve(
        preset: Preset,
        overrides: Option<&ConfigOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = preset.overrides().apply_to(Self::base(preset));
        if let Some(caller) = overrides {
            config = caller.apply_to(config);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("rsi_min", self.rsi_min),
            ("rsi_max", self.rsi_max),
            ("rel_vol_min", self.rel_vol_min),
            ("atr_mult", self.atr_mult),
            ("max_stretch_pct", self.max_stretch_pct),
            ("near_pct50", self.near_pct50),
            ("bb_mult", self.bb_mult),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(field, format!("{value} is not a finite number")));
            }
        }

        for (field, value) in [("rsi_min", self.rsi_min), ("rsi_max", self.rsi_max)] {
            if !(0.0..=100.0).contains(&value) {
                return Err(invalid(field, format!("{value} is outside 0-100")));
            }
        }
        if self.rsi_min > self.rsi_max {
            return Err(invalid(
                "rsi_min",
                format!("{} is above rsi_max {}", self.rsi_min, self.rsi_max),
            ));
        }

        for (field, value) in [
            ("rel_vol_min", self.rel_vol_min),
            ("atr_mult", self.atr_mult),
            ("max_stretch_pct", self.max_stretch_pct),
            ("near_pct50", self.near_pct50),
            ("bb_mult", self.bb_mult),
        ] {
            if value < 0.0 {
                return Err(invalid(field, format!("{value} is negative")));
            }
        }
        if self.bb_len == 0 {
            return Err(invalid("bb_len", "must be at least 1".to_string()));
        }

        Ok(())
    }

    /// Reserved flags that are switched on but have no predicate behind them.
    pub fn inert_flags(&self) -> Vec<&'static str> {
        [
            ("require_macd_above_0", self.require_macd_above_0),
            ("use_mtf_confirm", self.use_mtf_confirm),
            ("use_base_tightness", self.use_base_tightness),
            ("use_candle_quality", self.use_candle_quality),
            ("use_gap_guard", self.use_gap_guard),
        ]
        .into_iter()
        .filter_map(|(name, on)| on.then_some(name))
        .collect()
    }

    /// BLAKE3 digest of the canonical JSON form. Identical thresholds give
    /// identical fingerprints across runs and platforms.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_vec(self).expect("SwingConfig must serialize");
        blake3::hash(&json).to_hex().to_string()
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::InvalidInput { field, reason }
}

/// On-disk request: a preset name plus an optional `[overrides]` table.
///
/// ```toml
/// preset = "conservative"
///
/// [overrides]
/// rsi_min = 50
/// entry_mode = "any"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SwingRequest {
    #[serde(default)]
    pub preset: Preset,
    #[serde(default)]
    pub overrides: ConfigOverrides,
}

impl SwingRequest {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn resolve(&self) -> Result<SwingConfig, ConfigError> {
        SwingConfig::resolve(self.preset, Some(&self.overrides))
    }
}
