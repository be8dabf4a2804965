//! `SeaORM` Entity, @generated manually

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{Reasons, Regime, SignalLabel};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "signals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub symbol: String,
    pub signal: SignalLabel,
    pub score: i32, // nominally 0-100, not clamped
    #[sea_orm(column_type = "Double")]
    pub probability: f64,
    pub regime: Regime,
    #[sea_orm(column_type = "Double", nullable)]
    pub rsi: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub vol_z: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub upper_wick: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub ret_15: Option<f64>,
    pub cooldown_min: Option<i32>,
    #[sea_orm(column_type = "Double", nullable)]
    pub entry_price: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub stop_loss: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub target_price: Option<f64>,
    #[sea_orm(column_type = "Json")]
    pub reasons: Reasons,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
