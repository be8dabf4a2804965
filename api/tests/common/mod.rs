//! Test doubles shared by the api integration tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use api::services::SignalSource;
use async_trait::async_trait;
use chrono::Utc;
use shared::entity::{alerts, signals};
use shared::{
    get_db_connection, run_migrations, DatabaseStorage, NewAlert, NewSignal, Regime, SignalLabel,
    Storage,
};

pub async fn sqlite_storage() -> Arc<DatabaseStorage> {
    let db = get_db_connection("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    run_migrations(&db).await.expect("Failed to run migrations");
    Arc::new(DatabaseStorage::new(Arc::new(db)))
}

pub fn watch_list(symbols: &[&str]) -> Vec<String> {
    symbols.iter().map(|s| s.to_string()).collect()
}

pub fn sample_signal(symbol: &str, label: SignalLabel, score: i32) -> NewSignal {
    NewSignal {
        symbol: symbol.to_string(),
        signal: label,
        score,
        probability: 0.55,
        regime: Regime::Chop,
        rsi: Some(52.3),
        vol_z: Some(0.4),
        upper_wick: Some(0.2),
        ret_15: Some(0.1),
        cooldown_min: Some(3),
        entry_price: Some(250.0),
        stop_loss: Some(245.0),
        target_price: Some(262.5),
        reasons: vec!["RSI Alto".to_string()].into(),
    }
}

/// Returns a preset label per symbol (NEUTRO when unknown).
pub struct FixedSignalSource {
    labels: HashMap<String, SignalLabel>,
}

impl FixedSignalSource {
    pub fn new(labels: &[(&str, SignalLabel)]) -> Self {
        Self {
            labels: labels.iter().map(|(s, l)| (s.to_string(), *l)).collect(),
        }
    }
}

impl SignalSource for FixedSignalSource {
    fn generate(&self, symbol: &str) -> NewSignal {
        let label = self.labels.get(symbol).copied().unwrap_or(SignalLabel::Neutro);
        let score = if label.is_strong() { 85 } else { 60 };
        sample_signal(symbol, label, score)
    }
}

/// Vec-backed storage that can be told to reject inserts for some symbols.
#[derive(Default)]
pub struct MemoryStorage {
    signals: Mutex<Vec<signals::Model>>,
    alerts: Mutex<Vec<alerts::Model>>,
    failing_symbols: HashSet<String>,
}

impl MemoryStorage {
    pub fn failing_on(symbols: &[&str]) -> Self {
        Self {
            failing_symbols: symbols.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn signals(&self) -> Vec<signals::Model> {
        self.signals.lock().unwrap().clone()
    }

    pub fn alerts(&self) -> Vec<alerts::Model> {
        self.alerts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_signals(&self, min_score: f64, _only_strong: bool) -> Result<Vec<signals::Model>> {
        let mut rows: Vec<_> = self
            .signals()
            .into_iter()
            .filter(|s| s.score as f64 >= min_score)
            .collect();
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.score.cmp(&a.score)));
        rows.truncate(shared::SIGNALS_PAGE_LIMIT as usize);
        Ok(rows)
    }

    async fn get_signal(&self, id: i32) -> Result<Option<signals::Model>> {
        Ok(self.signals().into_iter().find(|s| s.id == id))
    }

    async fn create_signal(&self, signal: NewSignal) -> Result<signals::Model> {
        if self.failing_symbols.contains(&signal.symbol) {
            bail!("database unavailable for {}", signal.symbol);
        }
        let mut rows = self.signals.lock().unwrap();
        let model = signals::Model {
            id: rows.len() as i32 + 1,
            symbol: signal.symbol,
            signal: signal.signal,
            score: signal.score,
            probability: signal.probability,
            regime: signal.regime,
            rsi: signal.rsi,
            vol_z: signal.vol_z,
            upper_wick: signal.upper_wick,
            ret_15: signal.ret_15,
            cooldown_min: signal.cooldown_min,
            entry_price: signal.entry_price,
            stop_loss: signal.stop_loss,
            target_price: signal.target_price,
            reasons: signal.reasons,
            timestamp: Utc::now(),
        };
        rows.push(model.clone());
        Ok(model)
    }

    async fn get_alerts(&self, limit: u64) -> Result<Vec<alerts::Model>> {
        let mut rows = self.alerts();
        rows.reverse();
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn create_alert(&self, alert: NewAlert) -> Result<alerts::Model> {
        let mut rows = self.alerts.lock().unwrap();
        let model = alerts::Model {
            id: rows.len() as i32 + 1,
            message: alert.message,
            alert_type: alert.alert_type,
            timestamp: Utc::now(),
        };
        rows.push(model.clone());
        Ok(model)
    }

    async fn clear_old_signals(&self) -> Result<()> {
        Ok(())
    }
}
