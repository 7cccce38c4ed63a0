//! In-memory derived store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{DerivedStore, StoreError};
use crate::models::{
    Alert, AlertType, BehaviorAlert, BehaviorAlertType, BehaviorSummary, DailyEquityRecord,
    DailyRiskMetrics, StrategyCode, StrategyScore,
};

type DateKey = (StrategyCode, NaiveDate);
type AlertKey = (StrategyCode, NaiveDate, AlertType);
type BehaviorKey = (StrategyCode, NaiveDate, String, BehaviorAlertType);

/// In-memory implementation of [`DerivedStore`].
///
/// Suitable for testing and the CLI. BTreeMaps keep iteration order
/// deterministic, which makes idempotence checks byte-for-byte.
#[derive(Debug, Default)]
pub struct InMemoryDerivedStore {
    equity: RwLock<BTreeMap<DateKey, DailyEquityRecord>>,
    daily_metrics: RwLock<BTreeMap<DateKey, DailyRiskMetrics>>,
    scores: RwLock<BTreeMap<DateKey, StrategyScore>>,
    alerts: RwLock<BTreeMap<AlertKey, Alert>>,
    behavior_alerts: RwLock<BTreeMap<BehaviorKey, BehaviorAlert>>,
    behavior_summaries: RwLock<BTreeMap<DateKey, BehaviorSummary>>,
}

impl InMemoryDerivedStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored equity records, key order.
    #[must_use]
    pub fn equity_records(&self) -> Vec<DailyEquityRecord> {
        self.equity.read().unwrap().values().cloned().collect()
    }

    /// All stored daily metrics, key order.
    #[must_use]
    pub fn daily_metrics(&self) -> Vec<DailyRiskMetrics> {
        self.daily_metrics.read().unwrap().values().cloned().collect()
    }

    /// All stored scores, key order.
    #[must_use]
    pub fn scores(&self) -> Vec<StrategyScore> {
        self.scores.read().unwrap().values().cloned().collect()
    }

    /// All stored alerts, key order.
    #[must_use]
    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.read().unwrap().values().cloned().collect()
    }

    /// All stored behavior alerts, key order.
    #[must_use]
    pub fn behavior_alerts(&self) -> Vec<BehaviorAlert> {
        self.behavior_alerts.read().unwrap().values().cloned().collect()
    }

    /// All stored behavior summaries, key order.
    #[must_use]
    pub fn behavior_summaries(&self) -> Vec<BehaviorSummary> {
        self.behavior_summaries.read().unwrap().values().cloned().collect()
    }

    /// Serialize the whole store; two stores holding identical records
    /// produce identical documents.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        serde_json::json!({
            "equity": self.equity_records(),
            "daily_metrics": self.daily_metrics(),
            "scores": self.scores(),
            "alerts": self.alerts(),
            "behavior_alerts": self.behavior_alerts(),
            "behavior_summaries": self.behavior_summaries(),
        })
        .to_string()
    }
}

#[async_trait]
impl DerivedStore for InMemoryDerivedStore {
    async fn upsert_equity_series(&self, records: &[DailyEquityRecord]) -> Result<(), StoreError> {
        let mut map = self.equity.write().unwrap();
        for record in records {
            map.insert(
                (record.strategy_code.clone(), record.trade_date),
                record.clone(),
            );
        }
        Ok(())
    }

    async fn upsert_daily_metrics(&self, metrics: &[DailyRiskMetrics]) -> Result<(), StoreError> {
        let mut map = self.daily_metrics.write().unwrap();
        for m in metrics {
            map.insert((m.strategy_code.clone(), m.trade_date), m.clone());
        }
        Ok(())
    }

    async fn upsert_scores(&self, scores: &[StrategyScore]) -> Result<(), StoreError> {
        let mut map = self.scores.write().unwrap();
        for s in scores {
            map.insert((s.strategy_code.clone(), s.calc_date), s.clone());
        }
        Ok(())
    }

    async fn upsert_alerts(&self, alerts: &[Alert]) -> Result<(), StoreError> {
        let mut map = self.alerts.write().unwrap();
        for a in alerts {
            map.insert(
                (a.strategy_code.clone(), a.trade_date, a.alert_type),
                a.clone(),
            );
        }
        Ok(())
    }

    async fn upsert_behavior_alerts(&self, alerts: &[BehaviorAlert]) -> Result<(), StoreError> {
        let mut map = self.behavior_alerts.write().unwrap();
        for a in alerts {
            map.insert(
                (
                    a.strategy_code.clone(),
                    a.trade_date,
                    a.contract.clone(),
                    a.alert_type,
                ),
                a.clone(),
            );
        }
        Ok(())
    }

    async fn upsert_behavior_summaries(
        &self,
        summaries: &[BehaviorSummary],
    ) -> Result<(), StoreError> {
        let mut map = self.behavior_summaries.write().unwrap();
        for s in summaries {
            map.insert((s.strategy_code.clone(), s.calc_date), s.clone());
        }
        Ok(())
    }
}
