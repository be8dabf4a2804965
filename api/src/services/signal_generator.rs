//! Mock signal generator.
//!
//! Every field is drawn at random; two heuristics turn the draws into a
//! label and score:
//!
//! - **RSI extremes**: above [`RSI_HIGH`] suggests a short, below [`RSI_LOW`]
//!   a long (+10 each, mutually exclusive).
//! - **Volume spike**: a volume z-score above [`VOLUME_SPIKE_Z`] adds 15
//!   whatever the direction.
//!
//! A score strictly above [`STRONG_SCORE`] upgrades FRACO to FORTE.

use rand::Rng;
use shared::{NewSignal, Reasons, Regime, SignalLabel};

pub const BASE_SCORE: i32 = 50;
pub const RSI_HIGH: f64 = 65.0;
pub const RSI_LOW: f64 = 35.0;
pub const RSI_POINTS: i32 = 10;
pub const VOLUME_SPIKE_Z: f64 = 1.5;
pub const VOLUME_POINTS: i32 = 15;
pub const STRONG_SCORE: i32 = 75;

pub const STOP_LOSS_FACTOR: f64 = 0.98;
pub const TARGET_FACTOR: f64 = 1.05;

/// Anything that can produce a fresh signal for a symbol.
pub trait SignalSource: Send + Sync {
    fn generate(&self, symbol: &str) -> NewSignal;
}

/// Default source backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomSignalSource;

impl SignalSource for RandomSignalSource {
    fn generate(&self, symbol: &str) -> NewSignal {
        generate_signal(symbol, &mut rand::thread_rng())
    }
}

/// Running label/score/reasons while the heuristics are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    pub label: SignalLabel,
    pub score: i32,
    pub reasons: Reasons,
}

impl Default for ScoreCard {
    fn default() -> Self {
        Self {
            label: SignalLabel::Neutro,
            score: BASE_SCORE,
            reasons: Reasons::default(),
        }
    }
}

impl ScoreCard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_rsi(&mut self, rsi: f64) {
        if rsi > RSI_HIGH {
            self.label = SignalLabel::ShortFraco;
            self.add(RSI_POINTS, "RSI Alto");
        } else if rsi < RSI_LOW {
            self.label = SignalLabel::LongFraco;
            self.add(RSI_POINTS, "RSI Baixo");
        }
    }

    pub fn apply_volume(&mut self, vol_z: f64) {
        if vol_z > VOLUME_SPIKE_Z {
            self.add(VOLUME_POINTS, "Volume Alto");
        }
    }

    pub fn add(&mut self, points: i32, reason: &str) {
        self.score += points;
        self.reasons.push(reason);
    }

    /// Applies the FORTE upgrade. Must run after every contribution.
    pub fn finish(mut self) -> Self {
        if self.score > STRONG_SCORE {
            self.label = self.label.strengthened();
        }
        self
    }
}

pub fn score_signal(rsi: f64, vol_z: f64) -> ScoreCard {
    let mut card = ScoreCard::new();
    card.apply_rsi(rsi);
    card.apply_volume(vol_z);
    card.finish()
}

pub fn generate_signal<R: Rng + ?Sized>(symbol: &str, rng: &mut R) -> NewSignal {
    let regime = Regime::ALL[rng.gen_range(0..Regime::ALL.len())];
    let rsi = floor_to(rng.gen_range(30.0..70.0), 2);
    let vol_z = floor_to(rng.gen_range(-2.0..2.0), 2);

    let card = score_signal(rsi, vol_z);

    // Same offsets for longs and shorts.
    let entry_price = floor_to(rng.gen_range(100.0..1100.0), 2);
    let stop_loss = floor_to(entry_price * STOP_LOSS_FACTOR, 2);
    let target_price = floor_to(entry_price * TARGET_FACTOR, 2);

    NewSignal {
        symbol: symbol.to_string(),
        signal: card.label,
        score: card.score,
        probability: rng.gen_range(0.4..0.8),
        regime,
        rsi: Some(rsi),
        vol_z: Some(vol_z),
        upper_wick: Some(floor_to(rng.gen_range(0.0..1.0), 3)),
        ret_15: Some(floor_to(rng.gen_range(-1.0..1.0), 2)),
        cooldown_min: Some(rng.gen_range(0..10)),
        entry_price: Some(entry_price),
        stop_loss: Some(stop_loss),
        target_price: Some(target_price),
        reasons: card.reasons,
    }
}

/// Floors to `decimals` places, so a value drawn from `[lo, hi)` stays there.
fn floor_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).floor() / factor
}
