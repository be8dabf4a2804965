pub mod refresh_scheduler;
pub mod signal_generator;

pub use refresh_scheduler::{RefreshScheduler, TickReport};
pub use signal_generator::{generate_signal, score_signal, RandomSignalSource, ScoreCard, SignalSource};
