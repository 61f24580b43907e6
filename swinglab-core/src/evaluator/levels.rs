//! Entry, stop and target levels for a firing bar.

use crate::config::SwingConfig;
use crate::domain::{Signal, SignalMeta, TradeDate};

use super::precompute::{BarSnapshot, SwingIndicators};
use super::{R_MULTIPLES, STOP_BUFFER, SWING_LEN};

/// Build the signal for bar `bar.index`.
///
/// The stop is the lower of an ATR stop and a buffered swing-low stop. Risk is
/// floored at `f64::MIN_POSITIVE` so targets and reward ratios stay finite.
pub fn build_signal(
    date: TradeDate,
    bar: &BarSnapshot,
    ind: &SwingIndicators,
    config: &SwingConfig,
) -> Signal {
    let i = bar.index;
    let start = (i + 1).saturating_sub(SWING_LEN);
    let swing_low = ind.cols.lows[start..=i]
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);
    let swing_high = ind.cols.highs[start..=i]
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);

    let entry_px = bar.close;
    let stop_atr = entry_px - config.atr_mult * bar.atr;
    let stop_swing = swing_low * (1.0 - STOP_BUFFER);
    let stop = stop_atr.min(stop_swing);
    let risk = (entry_px - stop).max(f64::MIN_POSITIVE);

    Signal {
        date,
        entry_px,
        stop,
        targets: R_MULTIPLES.map(|r| entry_px + r * risk),
        rr_to_swing: (swing_high - entry_px) / risk,
        meta: SignalMeta {
            rsi: bar.rsi,
            rel_vol: bar.rel_vol,
            pct_above_50: bar.pct_above_50,
            entry_mode: config.entry_mode,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use crate::domain::BarColumns;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    fn indicators(lows: Vec<f64>, highs: Vec<f64>) -> SwingIndicators {
        let n = lows.len();
        SwingIndicators {
            cols: BarColumns {
                closes: vec![100.0; n],
                highs,
                lows,
                volumes: vec![1_000.0; n],
            },
            sma50: vec![f64::NAN; n],
            sma200: vec![f64::NAN; n],
            ema20: vec![f64::NAN; n],
            rsi14: vec![f64::NAN; n],
            atr14: vec![f64::NAN; n],
            highest20: vec![f64::NAN; n],
            vol_sma20: vec![f64::NAN; n],
        }
    }

    fn bar(index: usize, close: f64, atr: f64) -> BarSnapshot {
        BarSnapshot {
            index,
            close,
            sma50: 95.0,
            sma200: 90.0,
            rsi: 55.0,
            prev_rsi: 50.0,
            atr,
            rel_vol: 2.0,
            pct_above_50: 5.0,
            prior_high: 99.0,
            ema20: 98.0,
            prev_close: 97.0,
            prev_ema20: 97.5,
        }
    }

    #[test]
    fn atr_stop_when_lower() {
        // swing low 98 -> swing stop 97.804; atr stop 100 - 1.5*2 = 97
        let mut lows = vec![99.0; 12];
        lows[5] = 98.0;
        let mut highs = vec![101.0; 12];
        highs[8] = 106.0;
        let ind = indicators(lows, highs);
        let config = SwingConfig::base(Preset::Manual);
        let date = TradeDate::from_ymd(2024, 3, 1).unwrap();

        let s = build_signal(date, &bar(11, 100.0, 2.0), &ind, &config);
        assert_approx(s.stop, 97.0, DEFAULT_EPSILON);
        assert_approx(s.risk_per_share(), 3.0, DEFAULT_EPSILON);
        assert_approx(s.targets[0], 103.0, DEFAULT_EPSILON);
        assert_approx(s.targets[1], 104.5, DEFAULT_EPSILON);
        assert_approx(s.targets[2], 106.0, DEFAULT_EPSILON);
        assert_approx(s.rr_to_swing, 2.0, DEFAULT_EPSILON);
        assert_eq!(s.date, date);
        assert_eq!(s.meta.entry_mode, config.entry_mode);
    }

    #[test]
    fn swing_stop_when_lower() {
        let mut lows = vec![99.0; 12];
        lows[10] = 95.0;
        let ind = indicators(lows, vec![101.0; 12]);
        let config = SwingConfig::base(Preset::Manual);
        let s = build_signal(
            TradeDate::from_ymd(2024, 3, 1).unwrap(),
            &bar(11, 100.0, 0.5),
            &ind,
            &config,
        );
        assert_approx(s.stop, 95.0 * 0.998, DEFAULT_EPSILON);
    }

    #[test]
    fn swing_window_is_ten_bars() {
        // a deep low 10 bars back is outside the window
        let mut lows = vec![99.0; 12];
        lows[1] = 50.0;
        let ind = indicators(lows, vec![101.0; 12]);
        let config = SwingConfig::base(Preset::Manual);
        let s = build_signal(
            TradeDate::from_ymd(2024, 3, 1).unwrap(),
            &bar(11, 100.0, 0.0),
            &ind,
            &config,
        );
        assert_approx(s.stop, 99.0 * 0.998, DEFAULT_EPSILON);
    }

    #[test]
    fn targets_ascend_above_entry() {
        let ind = indicators(vec![99.0; 3], vec![101.0; 3]);
        let config = SwingConfig::base(Preset::Manual);
        let s = build_signal(
            TradeDate::from_ymd(2024, 3, 1).unwrap(),
            &bar(2, 100.0, 1.0),
            &ind,
            &config,
        );
        assert!(s.stop < s.entry_px);
        assert!(s.entry_px < s.targets[0]);
        assert!(s.targets[0] < s.targets[1] && s.targets[1] < s.targets[2]);
    }
}
