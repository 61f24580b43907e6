//! Named presets: partial overrides layered over the base defaults.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::overrides::ConfigOverrides;
use super::ConfigError;
use crate::domain::EntryMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Base defaults only.
    Manual,
    Aggressive,
    #[default]
    Balanced,
    Conservative,
    /// Every gate off and thresholds wide open, for operator diagnosis.
    Debug,
}

impl Preset {
    /// The preset's deltas against the base defaults.
    pub fn overrides(self) -> ConfigOverrides {
        match self {
            Self::Manual => ConfigOverrides::default(),
            Self::Aggressive => ConfigOverrides {
                rsi_min: Some(40.0),
                rsi_max: Some(65.0),
                rel_vol_min: Some(1.3),
                atr_mult: Some(1.5),
                max_stretch_pct: Some(15.0),
                near_pct50: Some(10.0),
                entry_mode: Some(EntryMode::Breakout),
                cooldown_bars: Some(3),
                ..ConfigOverrides::default()
            },
            Self::Balanced => ConfigOverrides {
                rsi_min: Some(43.0),
                rsi_max: Some(62.0),
                rel_vol_min: Some(1.5),
                atr_mult: Some(1.5),
                max_stretch_pct: Some(12.0),
                near_pct50: Some(8.0),
                entry_mode: Some(EntryMode::Breakout),
                cooldown_bars: Some(4),
                ..ConfigOverrides::default()
            },
            Self::Conservative => ConfigOverrides {
                rsi_min: Some(45.0),
                rsi_max: Some(60.0),
                rel_vol_min: Some(1.8),
                atr_mult: Some(1.5),
                max_stretch_pct: Some(10.0),
                near_pct50: Some(6.0),
                entry_mode: Some(EntryMode::Pullback),
                cooldown_bars: Some(5),
                ..ConfigOverrides::default()
            },
            Self::Debug => ConfigOverrides {
                rsi_min: Some(0.0),
                rsi_max: Some(100.0),
                rel_vol_min: Some(0.0),
                atr_mult: Some(3.0),
                max_stretch_pct: Some(200.0),
                near_pct50: Some(200.0),
                entry_mode: Some(EntryMode::Breakout),
                require_price_above_50: Some(false),
                require_trend_aligned: Some(false),
                require_entry_gate: Some(false),
                cooldown_bars: Some(0),
                require_macd_above_0: Some(false),
                use_mtf_confirm: Some(false),
                use_base_tightness: Some(false),
                use_candle_quality: Some(false),
                use_gap_guard: Some(false),
                ..ConfigOverrides::default()
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Aggressive => "aggressive",
            Self::Balanced => "balanced",
            Self::Conservative => "conservative",
            Self::Debug => "debug",
        }
    }

    /// All presets as a slice.
    pub fn all() -> &'static [Preset] {
        &[
            Self::Manual,
            Self::Aggressive,
            Self::Balanced,
            Self::Conservative,
            Self::Debug,
        ]
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| ConfigError::UnknownPreset(s.trim().to_string()))
    }
}
