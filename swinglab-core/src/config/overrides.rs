//! Partial configuration records.
//!
//! Both preset deltas and caller overrides are `ConfigOverrides`; resolution
//! applies them in order over the base defaults, later values winning.

use serde::{Deserialize, Serialize};

use super::{ConfigError, SwingConfig};
use crate::domain::EntryMode;

/// A partial `SwingConfig`. `None` leaves the lower tier's value in place.
///
/// Keys are snake_case; the camelCase names used by the HTTP payloads
/// (`rsiMin`, `relVolMin`, ...) are accepted as aliases. Unknown keys are an
/// error so a typo never silently falls back to a default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    #[serde(default, alias = "rsiMin", skip_serializing_if = "Option::is_none")]
    pub rsi_min: Option<f64>,
    #[serde(default, alias = "rsiMax", skip_serializing_if = "Option::is_none")]
    pub rsi_max: Option<f64>,
    #[serde(default, alias = "relVolMin", skip_serializing_if = "Option::is_none")]
    pub rel_vol_min: Option<f64>,
    #[serde(default, alias = "atrMult", skip_serializing_if = "Option::is_none")]
    pub atr_mult: Option<f64>,
    #[serde(default, alias = "maxStretchPct", skip_serializing_if = "Option::is_none")]
    pub max_stretch_pct: Option<f64>,
    #[serde(default, alias = "nearPct50", skip_serializing_if = "Option::is_none")]
    pub near_pct50: Option<f64>,
    #[serde(default, alias = "entryMode", skip_serializing_if = "Option::is_none")]
    pub entry_mode: Option<EntryMode>,
    #[serde(default, alias = "requirePriceAbove50", skip_serializing_if = "Option::is_none")]
    pub require_price_above_50: Option<bool>,
    #[serde(default, alias = "requireTrendAligned", skip_serializing_if = "Option::is_none")]
    pub require_trend_aligned: Option<bool>,
    #[serde(default, alias = "requireEntryGate", skip_serializing_if = "Option::is_none")]
    pub require_entry_gate: Option<bool>,
    #[serde(default, alias = "allowRepeatEntries", skip_serializing_if = "Option::is_none")]
    pub allow_repeat_entries: Option<bool>,
    #[serde(default, alias = "cooldownBars", skip_serializing_if = "Option::is_none")]
    pub cooldown_bars: Option<u32>,
    #[serde(default, alias = "requireMacdAbove0", skip_serializing_if = "Option::is_none")]
    pub require_macd_above_0: Option<bool>,
    #[serde(default, alias = "useMTFConfirm", skip_serializing_if = "Option::is_none")]
    pub use_mtf_confirm: Option<bool>,
    #[serde(default, alias = "useBaseTightness", skip_serializing_if = "Option::is_none")]
    pub use_base_tightness: Option<bool>,
    #[serde(default, alias = "useCandleQuality", skip_serializing_if = "Option::is_none")]
    pub use_candle_quality: Option<bool>,
    #[serde(default, alias = "useGapGuard", skip_serializing_if = "Option::is_none")]
    pub use_gap_guard: Option<bool>,
    #[serde(default, alias = "bbLen", skip_serializing_if = "Option::is_none")]
    pub bb_len: Option<u32>,
    #[serde(default, alias = "bbMult", skip_serializing_if = "Option::is_none")]
    pub bb_mult: Option<f64>,
}

impl ConfigOverrides {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Layer `self` over another set of overrides; fields set here win.
    pub fn apply_over(&self, base: &ConfigOverrides) -> ConfigOverrides {
        ConfigOverrides {
            rsi_min: self.rsi_min.or(base.rsi_min),
            rsi_max: self.rsi_max.or(base.rsi_max),
            rel_vol_min: self.rel_vol_min.or(base.rel_vol_min),
            atr_mult: self.atr_mult.or(base.atr_mult),
            max_stretch_pct: self.max_stretch_pct.or(base.max_stretch_pct),
            near_pct50: self.near_pct50.or(base.near_pct50),
            entry_mode: self.entry_mode.or(base.entry_mode),
            require_price_above_50: self.require_price_above_50.or(base.require_price_above_50),
            require_trend_aligned: self.require_trend_aligned.or(base.require_trend_aligned),
            require_entry_gate: self.require_entry_gate.or(base.require_entry_gate),
            allow_repeat_entries: self.allow_repeat_entries.or(base.allow_repeat_entries),
            cooldown_bars: self.cooldown_bars.or(base.cooldown_bars),
            require_macd_above_0: self.require_macd_above_0.or(base.require_macd_above_0),
            use_mtf_confirm: self.use_mtf_confirm.or(base.use_mtf_confirm),
            use_base_tightness: self.use_base_tightness.or(base.use_base_tightness),
            use_candle_quality: self.use_candle_quality.or(base.use_candle_quality),
            use_gap_guard: self.use_gap_guard.or(base.use_gap_guard),
            bb_len: self.bb_len.or(base.bb_len),
            bb_mult: self.bb_mult.or(base.bb_mult),
        }
    }

    /// Shallow merge: every `Some` field replaces the corresponding field of `base`.
    pub fn apply_to(&self, base: SwingConfig) -> SwingConfig {
        SwingConfig {
            preset: base.preset,
            rsi_min: self.rsi_min.unwrap_or(base.rsi_min),
            rsi_max: self.rsi_max.unwrap_or(base.rsi_max),
            rel_vol_min: self.rel_vol_min.unwrap_or(base.rel_vol_min),
            atr_mult: self.atr_mult.unwrap_or(base.atr_mult),
            max_stretch_pct: self.max_stretch_pct.unwrap_or(base.max_stretch_pct),
            near_pct50: self.near_pct50.unwrap_or(base.near_pct50),
            entry_mode: self.entry_mode.unwrap_or(base.entry_mode),
            require_price_above_50: self
                .require_price_above_50
                .unwrap_or(base.require_price_above_50),
            require_trend_aligned: self
                .require_trend_aligned
                .unwrap_or(base.require_trend_aligned),
            require_entry_gate: self.require_entry_gate.unwrap_or(base.require_entry_gate),
            allow_repeat_entries: self
                .allow_repeat_entries
                .unwrap_or(base.allow_repeat_entries),
            cooldown_bars: self.cooldown_bars.unwrap_or(base.cooldown_bars),
            require_macd_above_0: self
                .require_macd_above_0
                .unwrap_or(base.require_macd_above_0),
            use_mtf_confirm: self.use_mtf_confirm.unwrap_or(base.use_mtf_confirm),
            use_base_tightness: self.use_base_tightness.unwrap_or(base.use_base_tightness),
            use_candle_quality: self.use_candle_quality.unwrap_or(base.use_candle_quality),
            use_gap_guard: self.use_gap_guard.unwrap_or(base.use_gap_guard),
            bb_len: self.bb_len.unwrap_or(base.bb_len),
            bb_mult: self.bb_mult.unwrap_or(base.bb_mult),
        }
    }
}
