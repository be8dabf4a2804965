//! Typed values shared by the signal and alert tables, plus the pre-insert
//! records the scheduler hands to [`crate::Storage`].

use sea_orm::entity::prelude::*;
use sea_orm::sea_query::StringLen;
use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};

/// Marker carried by every "strong" label.
pub const STRONG_MARKER: &str = "FORTE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum SignalLabel {
    #[sea_orm(string_value = "LONG_FORTE")]
    #[serde(rename = "LONG_FORTE")]
    LongForte,
    #[sea_orm(string_value = "LONG_FRACO")]
    #[serde(rename = "LONG_FRACO")]
    LongFraco,
    #[sea_orm(string_value = "SHORT_FORTE")]
    #[serde(rename = "SHORT_FORTE")]
    ShortForte,
    #[sea_orm(string_value = "SHORT_FRACO")]
    #[serde(rename = "SHORT_FRACO")]
    ShortFraco,
    #[sea_orm(string_value = "NEUTRO")]
    #[serde(rename = "NEUTRO")]
    Neutro,
}

impl SignalLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalLabel::LongForte => "LONG_FORTE",
            SignalLabel::LongFraco => "LONG_FRACO",
            SignalLabel::ShortForte => "SHORT_FORTE",
            SignalLabel::ShortFraco => "SHORT_FRACO",
            SignalLabel::Neutro => "NEUTRO",
        }
    }

    /// True when the label carries the FORTE marker.
    pub fn is_strong(&self) -> bool {
        self.as_str().contains(STRONG_MARKER)
    }

    /// FRACO -> FORTE. NEUTRO and already-strong labels are returned as is.
    pub fn strengthened(self) -> Self {
        match self {
            SignalLabel::LongFraco => SignalLabel::LongForte,
            SignalLabel::ShortFraco => SignalLabel::ShortForte,
            other => other,
        }
    }
}

impl std::fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Regime {
    #[sea_orm(string_value = "BULL")]
    #[serde(rename = "BULL")]
    Bull,
    #[sea_orm(string_value = "BEAR")]
    #[serde(rename = "BEAR")]
    Bear,
    #[sea_orm(string_value = "CHOP")]
    #[serde(rename = "CHOP")]
    Chop,
}

impl Regime {
    pub const ALL: [Regime; 3] = [Regime::Bull, Regime::Bear, Regime::Chop];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum AlertType {
    #[sea_orm(string_value = "NEW_SIGNAL")]
    #[serde(rename = "NEW_SIGNAL")]
    NewSignal,
    // Nothing raises upgrade alerts yet.
    #[sea_orm(string_value = "UPGRADE")]
    #[serde(rename = "UPGRADE")]
    Upgrade,
}

/// Ordered list of human readable reasons, stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct Reasons(pub Vec<String>);

impl Reasons {
    pub fn push(&mut self, reason: impl Into<String>) {
        self.0.push(reason.into());
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for Reasons {
    fn from(reasons: Vec<String>) -> Self {
        Reasons(reasons)
    }
}

/// A signal before the store assigns `id` and `timestamp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSignal {
    pub symbol: String,
    pub signal: SignalLabel,
    pub score: i32,
    pub probability: f64,
    pub regime: Regime,
    pub rsi: Option<f64>,
    pub vol_z: Option<f64>,
    pub upper_wick: Option<f64>,
    pub ret_15: Option<f64>,
    pub cooldown_min: Option<i32>,
    pub entry_price: Option<f64>,
    pub stop_loss: Option<f64>,
    pub target_price: Option<f64>,
    #[serde(default)]
    pub reasons: Reasons,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAlert {
    pub message: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
}

impl NewAlert {
    /// Alert raised when a freshly generated signal is strong.
    pub fn strong_signal(symbol: &str, label: SignalLabel) -> Self {
        Self {
            message: format!("Sinal FORTE detectado em {} ({})", symbol, label),
            alert_type: AlertType::NewSignal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_strengthened_only_touches_weak_labels() {
        assert_eq!(SignalLabel::LongFraco.strengthened(), SignalLabel::LongForte);
        assert_eq!(SignalLabel::ShortFraco.strengthened(), SignalLabel::ShortForte);
        assert_eq!(SignalLabel::Neutro.strengthened(), SignalLabel::Neutro);
        assert_eq!(SignalLabel::LongForte.strengthened(), SignalLabel::LongForte);
    }

    #[test]
    fn test_strength_marker() {
        for label in SignalLabel::iter() {
            assert_eq!(label.is_strong(), label.to_string().contains("FORTE"));
            assert!(!label.strengthened().to_string().contains("FRACO"));
        }
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_string(&SignalLabel::ShortFraco).unwrap();
        assert_eq!(json, "\"SHORT_FRACO\"");
        let regime: Regime = serde_json::from_str("\"CHOP\"").unwrap();
        assert_eq!(regime, Regime::Chop);

        let alert = NewAlert::strong_signal("BTCUSDT", SignalLabel::LongForte);
        let value = serde_json::to_value(&alert).unwrap();
        assert_eq!(value["type"], "NEW_SIGNAL");
        assert_eq!(value["message"], "Sinal FORTE detectado em BTCUSDT (LONG_FORTE)");
    }

    #[test]
    fn test_reasons_serialize_as_plain_array() {
        let mut reasons = Reasons::default();
        reasons.push("RSI Alto");
        reasons.push("Volume Alto");
        assert_eq!(
            serde_json::to_value(&reasons).unwrap(),
            serde_json::json!(["RSI Alto", "Volume Alto"])
        );
    }
}
