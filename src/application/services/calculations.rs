//! Calculation history service
//!
//! Persists completed calculator entries and serves the most-recent
//! slice for the history panel. Storage keeps at most the 50 latest
//! entries; the panel shows 10 by default.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::application::calculator::CalculationEntry;
use crate::domain::{Calculation, DomainResult};
use crate::infrastructure::Storage;

/// Default number of entries shown in the history panel
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Service for the calculation log
pub struct CalculationService {
    storage: Arc<dyn Storage>,
}

impl CalculationService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Record a completed calculation.
    pub async fn record(&self, entry: &CalculationEntry) -> DomainResult<Calculation> {
        let calculation = Calculation {
            id: 0,
            first_operand: entry.first_operand,
            operator: entry.operator.symbol().to_string(),
            second_operand: entry.second_operand,
            result: entry.result,
            timestamp: Utc::now(),
        };

        let saved = self.storage.insert_calculation(calculation).await?;
        info!(calculation_id = saved.id, "Calculation recorded");
        Ok(saved)
    }

    /// Most recent entries, newest first.
    pub async fn recent(&self, limit: usize) -> DomainResult<Vec<Calculation>> {
        self.storage.recent_calculations(limit).await
    }

    /// Everything currently retained, newest first.
    pub async fn history(&self) -> DomainResult<Vec<Calculation>> {
        self.storage.list_calculations().await
    }

    pub async fn clear(&self) -> DomainResult<()> {
        self.storage.clear_calculations().await?;
        info!("Calculation history cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::calculator::Operator;
    use crate::infrastructure::{InMemoryStorage, LatencyProfile};

    fn service() -> CalculationService {
        let storage = Arc::new(InMemoryStorage::seeded(LatencyProfile::none()).unwrap());
        CalculationService::new(storage)
    }

    fn entry(first: f64, second: f64) -> CalculationEntry {
        CalculationEntry {
            first_operand: first,
            operator: Operator::Add,
            second_operand: second,
            result: first + second,
        }
    }

    #[tokio::test]
    async fn recorded_entries_come_back_newest_first() {
        let svc = service();
        svc.record(&entry(1.0, 1.0)).await.unwrap();
        let latest = svc.record(&entry(2.0, 2.0)).await.unwrap();

        let recent = svc.recent(DEFAULT_HISTORY_LIMIT).await.unwrap();
        assert_eq!(recent[0].id, latest.id);
        assert_eq!(recent[0].operator, "+");
        assert_eq!(recent[0].result, 4.0);
    }

    #[tokio::test]
    async fn recent_respects_the_limit() {
        let svc = service();
        for i in 0..5 {
            svc.record(&entry(i as f64, 1.0)).await.unwrap();
        }
        assert_eq!(svc.recent(3).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn clear_empties_the_log() {
        let svc = service();
        svc.record(&entry(1.0, 2.0)).await.unwrap();
        svc.clear().await.unwrap();
        assert!(svc.history().await.unwrap().is_empty());
    }
}
