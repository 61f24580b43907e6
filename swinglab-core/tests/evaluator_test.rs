//! Evaluator scenarios: flat history, staged breakouts, first-pass
//! de-duplication and the service entry points built on top of them.

use swinglab_core::config::{ConfigOverrides, Preset, SwingConfig};
use swinglab_core::domain::{EntryMode, EvaluationStatus, PriceBar, TradeDate};
use swinglab_core::evaluator::{EntryGate, Evaluator, SwingIndicators, REASON_NOT_FIRST_PASS};
use swinglab_core::indicators::{atr, true_range};
use swinglab_core::service::SwingService;
use swinglab_core::store::MemoryStore;

// ── Helpers ──────────────────────────────────────────────────────────

fn start() -> TradeDate {
    TradeDate::from_ymd(2023, 1, 2).unwrap()
}

fn bar(i: usize, close: f64, spread: f64, volume: u64) -> PriceBar {
    PriceBar {
        trade_date: start().add_days(i as i64),
        open: close,
        high: close + spread,
        low: close - spread,
        close,
        volume,
    }
}

fn flat_bars(n: usize) -> Vec<PriceBar> {
    (0..n).map(|i| bar(i, 100.0, 0.0, 1_000)).collect()
}

/// Slow rise of 0.1 per bar with +5 jumps on bars 230 and 231. Those two
/// bars are the only closes above the prior 20-bar high.
fn staged_breakout(n: usize) -> Vec<PriceBar> {
    (0..n)
        .map(|i| {
            let mut close = 100.0 + 0.1 * i as f64;
            if i >= 230 {
                close += 5.0;
            }
            if i >= 231 {
                close += 5.0;
            }
            bar(i, close, 0.5, 1_000)
        })
        .collect()
}

/// Index of the pullback-reclaim bar in `pullback_reclaim`.
const RECLAIM: usize = 245;

/// Rise of 0.2 per bar to 147.8 on bar 239, five one-point down days to
/// 142.8, then a close of 146.5 on bar 245 on triple volume. The dip ends
/// below the 20-day EMA near the 50-day average; bar 245 closes back above
/// the EMA with RSI turning up from about 26 to about 51. Every other bar
/// trades on flat volume, so no other bar clears a 1.8 relative-volume floor.
fn pullback_reclaim() -> Vec<PriceBar> {
    (0..250)
        .map(|i| {
            let close = match i {
                0..=239 => 100.0 + 0.2 * i as f64,
                240..=244 => 147.8 - (i - 239) as f64,
                _ => 146.5 + 0.2 * (i - RECLAIM) as f64,
            };
            let volume = if i == RECLAIM { 3_000 } else { 1_000 };
            bar(i, close, 0.5, volume)
        })
        .collect()
}

fn conservative_with(entry_mode: EntryMode) -> SwingConfig {
    let o = ConfigOverrides {
        entry_mode: Some(entry_mode),
        ..ConfigOverrides::default()
    };
    SwingConfig::resolve(Preset::Conservative, Some(&o)).unwrap()
}

/// Debug thresholds with the breakout gate switched back on.
fn breakout_config(allow_repeat: bool) -> SwingConfig {
    let o = ConfigOverrides {
        require_entry_gate: Some(true),
        allow_repeat_entries: Some(allow_repeat),
        ..ConfigOverrides::default()
    };
    SwingConfig::resolve(Preset::Debug, Some(&o)).unwrap()
}

fn index_of(bars: &[PriceBar], date: TradeDate) -> usize {
    bars.iter().position(|b| b.trade_date == date).unwrap()
}

// ── Flat history ─────────────────────────────────────────────────────

#[test]
fn sixty_flat_bars_never_fire_and_atr_stays_zero() {
    let bars = flat_bars(60);
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    assert!(true_range(&highs, &lows, &closes).iter().all(|&tr| tr == 0.0));
    let series = atr(&highs, &lows, &closes, 14);
    assert!(series[0].is_nan());
    assert!(series[1..].iter().all(|&v| v == 0.0));

    // Sixty bars never reach the 200-bar average: scans return before any
    // predicate runs and no bar has a snapshot.
    let ind = SwingIndicators::compute(&bars);
    assert!((0..bars.len()).all(|i| ind.snapshot(i).is_none()));
    for preset in Preset::all() {
        let ev = Evaluator::new(SwingConfig::resolve(*preset, None).unwrap());
        assert!(ev.scan(&bars).is_empty(), "preset {preset}");
    }
}

#[test]
fn long_flat_history_has_no_breakout() {
    let bars = flat_bars(300);
    let config = breakout_config(true);
    let gate = EntryGate::from_config(&config);
    let ind = SwingIndicators::compute(&bars);
    let snapshots: Vec<_> = (0..bars.len()).filter_map(|i| ind.snapshot(i)).collect();
    assert_eq!(snapshots.len(), 101);
    assert!(snapshots.iter().all(|snap| !gate.evaluate(snap).breakout));
    assert!(Evaluator::new(config).scan(&bars).is_empty());
}

// ── Staged breakout ──────────────────────────────────────────────────

#[test]
fn first_pass_law_suppresses_the_second_breakout() {
    let bars = staged_breakout(260);
    let signals = Evaluator::new(breakout_config(false)).scan(&bars);
    let idx: Vec<usize> = signals.iter().map(|s| index_of(&bars, s.date)).collect();
    assert_eq!(idx, vec![230]);
}

#[test]
fn repeat_entries_report_every_breakout() {
    let bars = staged_breakout(260);
    let signals = Evaluator::new(breakout_config(true)).scan(&bars);
    let idx: Vec<usize> = signals.iter().map(|s| index_of(&bars, s.date)).collect();
    assert_eq!(idx, vec![230, 231]);
}

#[test]
fn breakout_levels() {
    let bars = staged_breakout(260);
    let signals = Evaluator::new(breakout_config(false)).scan(&bars);
    let s = &signals[0];

    assert!((s.entry_px - 128.0).abs() < 1e-9);
    // swing window is bars 221..=230; lowest low is bar 221
    let swing_low = 100.0 + 22.1 - 0.5;
    assert!((s.stop - swing_low * 0.998).abs() < 1e-9);
    let risk = s.entry_px - s.stop;
    assert!((s.targets[0] - (s.entry_px + risk)).abs() < 1e-9);
    assert!((s.targets[1] - (s.entry_px + 1.5 * risk)).abs() < 1e-9);
    assert!((s.targets[2] - (s.entry_px + 2.0 * risk)).abs() < 1e-9);
    assert!((s.rr_to_swing - 0.5 / risk).abs() < 1e-9);
    assert_eq!(s.meta.entry_mode, EntryMode::Breakout);
    assert_eq!(s.meta.rsi, 100.0);
}

#[test]
fn point_evaluation_explains_suppressed_bar() {
    let bars = staged_breakout(260);
    let ev = Evaluator::new(breakout_config(false));

    let fired = ev.evaluate_date(&bars, bars[230].trade_date, false);
    assert!(fired.passed);
    assert_eq!(fired.status, EvaluationStatus::Passed);

    let repeat = ev.evaluate_date(&bars, bars[231].trade_date, false);
    assert!(!repeat.passed);
    assert_eq!(repeat.status, EvaluationStatus::Rejected);
    assert_eq!(repeat.reasons, [REASON_NOT_FIRST_PASS]);

    let quiet = ev.evaluate_date(&bars, bars[240].trade_date, false);
    assert!(!quiet.passed);
    assert_eq!(
        quiet.reasons,
        ["entry gate failed (breakout:false, pullback:false)"]
    );
}

#[test]
fn point_and_scan_agree_on_every_bar() {
    let bars = staged_breakout(260);
    let ev = Evaluator::new(breakout_config(false));
    let signals = ev.scan(&bars);

    for i in 199..bars.len() {
        let r = ev.evaluate_index(&bars, i, false);
        let scanned = signals.iter().find(|s| s.date == bars[i].trade_date);
        assert_eq!(r.signal.as_ref(), scanned, "bar {i}");
    }
}

#[test]
fn point_evaluation_never_reads_later_bars() {
    let bars = staged_breakout(260);
    let ev = Evaluator::new(breakout_config(false));
    let full = ev.evaluate_index(&bars, 230, true);
    let truncated = ev.evaluate_index(&bars[..=230], 230, true);
    assert_eq!(full, truncated);
}

#[test]
fn manual_preset_rejects_with_reasons() {
    let bars = staged_breakout(260);
    let ev = Evaluator::new(SwingConfig::resolve(Preset::Manual, None).unwrap());
    let r = ev.evaluate_date(&bars, bars[240].trade_date, false);
    assert!(!r.passed);
    assert!(r.reasons.iter().any(|x| x.starts_with("rsi 100.0 outside 45-60")));
    assert!(r.reasons.iter().any(|x| x == "relVol 1.00 < 1.8"));
}

// ── Pullback reclaim ─────────────────────────────────────────────────

#[test]
fn reclaim_bar_sees_previous_bar_below_the_ema() {
    let bars = pullback_reclaim();
    let snap = SwingIndicators::compute(&bars).snapshot(RECLAIM).unwrap();
    assert!((snap.prev_close - 142.8).abs() < 1e-9);
    assert!(snap.prev_close <= snap.prev_ema20, "{snap:?}");
    assert!(snap.close > snap.ema20, "{snap:?}");
    assert!(snap.rsi > snap.prev_rsi, "{snap:?}");
    assert!(snap.pct_above_50.abs() <= 6.0, "{snap:?}");
    assert!(snap.close <= snap.prior_high);
}

#[test]
fn conservative_pullback_fires_once_on_the_reclaim() {
    let bars = pullback_reclaim();
    let ev = Evaluator::new(SwingConfig::resolve(Preset::Conservative, None).unwrap());
    let signals = ev.scan(&bars);

    assert_eq!(signals.len(), 1);
    let s = &signals[0];
    assert_eq!(s.date, bars[RECLAIM].trade_date);
    assert_eq!(s.entry_px, 146.5);
    assert_eq!(s.meta.entry_mode, EntryMode::Pullback);
    assert!((s.meta.rsi - (100.0 - 100.0 / 2.06)).abs() < 1e-6);
    assert!((s.meta.rel_vol - 3.0 / 1.1).abs() < 1e-9);

    let r = ev.evaluate_index(&bars, RECLAIM, true);
    assert!(r.passed);
    assert_eq!(r.signal.as_ref(), Some(s));
    assert_eq!(r.reasons.len(), 6);
    assert!(r.reasons.iter().all(|x| x.ends_with(" ok")), "{:?}", r.reasons);
}

#[test]
fn reclaim_is_not_a_breakout() {
    let bars = pullback_reclaim();

    let breakout = Evaluator::new(conservative_with(EntryMode::Breakout));
    assert!(breakout.scan(&bars).is_empty());
    let r = breakout.evaluate_index(&bars, RECLAIM, false);
    assert_eq!(r.status, EvaluationStatus::Rejected);
    assert_eq!(r.reasons, ["entry gate failed (breakout:false, pullback:true)"]);

    let either = Evaluator::new(conservative_with(EntryMode::Any));
    let idx: Vec<usize> = either
        .scan(&bars)
        .iter()
        .map(|s| index_of(&bars, s.date))
        .collect();
    assert_eq!(idx, vec![RECLAIM]);
}

// ── Service ──────────────────────────────────────────────────────────

fn service() -> SwingService<MemoryStore> {
    SwingService::new(
        MemoryStore::new()
            .with_ticker("BRK", staged_breakout(260))
            .with_ticker("FLAT", flat_bars(260)),
    )
}

fn breakout_overrides() -> ConfigOverrides {
    ConfigOverrides {
        require_entry_gate: Some(true),
        allow_repeat_entries: Some(false),
        ..ConfigOverrides::default()
    }
}

#[test]
fn analyze_swing_filters_to_range() {
    let svc = service();
    let o = breakout_overrides();
    let bars = staged_breakout(260);

    let all = svc
        .analyze_swing("BRK", bars[0].trade_date, bars[259].trade_date, Preset::Debug, Some(&o))
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].date, bars[230].trade_date);

    let after = svc
        .analyze_swing("brk", bars[231].trade_date, bars[259].trade_date, Preset::Debug, Some(&o))
        .unwrap();
    assert!(after.is_empty());

    // `to` before the breakout: the bar is never fetched
    let before = svc
        .analyze_swing("BRK", bars[0].trade_date, bars[229].trade_date, Preset::Debug, Some(&o))
        .unwrap();
    assert!(before.is_empty());
}

#[test]
fn analyze_swing_is_idempotent() {
    let svc = service();
    let o = breakout_overrides();
    let from = start();
    let to = start().add_days(400);
    let a = svc.analyze_swing("BRK", from, to, Preset::Debug, Some(&o)).unwrap();
    let b = svc.analyze_swing("BRK", from, to, Preset::Debug, Some(&o)).unwrap();
    assert_eq!(a, b);
    assert!(!a.is_empty());
}

#[test]
fn evaluate_ticker_for_date_statuses() {
    let svc = service();
    let o = breakout_overrides();
    let bars = staged_breakout(260);

    let unknown = svc
        .evaluate_ticker_for_date("ZZZZ", bars[230].trade_date, Preset::Debug, None, false)
        .unwrap();
    assert!(!unknown.passed);
    assert_eq!(unknown.reasons, ["ticker not found"]);

    let hit = svc
        .evaluate_ticker_for_date("BRK", bars[230].trade_date, Preset::Debug, Some(&o), true)
        .unwrap();
    assert!(hit.passed);
    assert!(hit.reasons.iter().all(|r| r.ends_with(" ok")));

    let missing = start().add_days(1_000);
    let gone = svc
        .evaluate_ticker_for_date("BRK", missing, Preset::Debug, None, false)
        .unwrap();
    assert_eq!(gone.status, EvaluationStatus::InsufficientHistory);
    assert_eq!(gone.reasons, ["no price data"]);

    let early = svc
        .evaluate_ticker_for_date("FLAT", bars[50].trade_date, Preset::Debug, None, false)
        .unwrap();
    assert_eq!(early.status, EvaluationStatus::InsufficientHistory);
    assert_eq!(early.reasons, ["insufficient indicator history"]);
}
