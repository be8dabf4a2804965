use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{prelude::*, ActiveValue::{NotSet, Set}, QueryOrder, QuerySelect};
use tracing::debug;

use crate::entity::{alerts, signals};
use crate::models::{NewAlert, NewSignal};

/// Row cap for the signal listing.
pub const SIGNALS_PAGE_LIMIT: u64 = 30;
pub const DEFAULT_ALERTS_LIMIT: u64 = 20;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Signals with `score >= min_score`, newest first then highest score,
    /// capped at [`SIGNALS_PAGE_LIMIT`]. `only_strong` is accepted but does
    /// not narrow the result.
    async fn get_signals(&self, min_score: f64, only_strong: bool) -> Result<Vec<signals::Model>>;

    /// `Ok(None)` when no signal has this id.
    async fn get_signal(&self, id: i32) -> Result<Option<signals::Model>>;

    async fn create_signal(&self, signal: NewSignal) -> Result<signals::Model>;

    async fn get_alerts(&self, limit: u64) -> Result<Vec<alerts::Model>>;

    async fn create_alert(&self, alert: NewAlert) -> Result<alerts::Model>;

    /// Retention hook. Nothing is pruned.
    async fn clear_old_signals(&self) -> Result<()>;
}

pub struct DatabaseStorage {
    db: Arc<DatabaseConnection>,
}

impl DatabaseStorage {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Storage for DatabaseStorage {
    async fn get_signals(&self, min_score: f64, only_strong: bool) -> Result<Vec<signals::Model>> {
        debug!("Listing signals (min_score={}, only_strong={})", min_score, only_strong);
        // NaN compares false against every score.
        if min_score.is_nan() {
            return Ok(Vec::new());
        }

        let signals = signals::Entity::find()
            .filter(signals::Column::Score.gte(min_score))
            .order_by_desc(signals::Column::Timestamp)
            .order_by_desc(signals::Column::Score)
            .limit(SIGNALS_PAGE_LIMIT)
            .all(self.db.as_ref())
            .await?;
        Ok(signals)
    }

    async fn get_signal(&self, id: i32) -> Result<Option<signals::Model>> {
        let signal = signals::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        Ok(signal)
    }

    async fn create_signal(&self, signal: NewSignal) -> Result<signals::Model> {
        let active_model = signals::ActiveModel {
            id: NotSet,
            symbol: Set(signal.symbol),
            signal: Set(signal.signal),
            score: Set(signal.score),
            probability: Set(signal.probability),
            regime: Set(signal.regime),
            rsi: Set(signal.rsi),
            vol_z: Set(signal.vol_z),
            upper_wick: Set(signal.upper_wick),
            ret_15: Set(signal.ret_15),
            cooldown_min: Set(signal.cooldown_min),
            entry_price: Set(signal.entry_price),
            stop_loss: Set(signal.stop_loss),
            target_price: Set(signal.target_price),
            reasons: Set(signal.reasons),
            timestamp: Set(Utc::now()),
        };

        let signal = signals::Entity::insert(active_model)
            .exec_with_returning(self.db.as_ref())
            .await?;
        debug!("Stored signal #{} for {} ({})", signal.id, signal.symbol, signal.signal);
        Ok(signal)
    }

    async fn get_alerts(&self, limit: u64) -> Result<Vec<alerts::Model>> {
        let alerts = alerts::Entity::find()
            .order_by_desc(alerts::Column::Timestamp)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;
        Ok(alerts)
    }

    async fn create_alert(&self, alert: NewAlert) -> Result<alerts::Model> {
        let active_model = alerts::ActiveModel {
            id: NotSet,
            message: Set(alert.message),
            alert_type: Set(alert.alert_type),
            timestamp: Set(Utc::now()),
        };

        let alert = alerts::Entity::insert(active_model)
            .exec_with_returning(self.db.as_ref())
            .await?;
        debug!("Stored alert #{}: {}", alert.id, alert.message);
        Ok(alert)
    }

    async fn clear_old_signals(&self) -> Result<()> {
        debug!("Signal retention is not configured; keeping all rows");
        Ok(())
    }
}
