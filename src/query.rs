//! Read-only aggregates derived from the ledger. Nothing here caches or
//! mutates; every answer is recomputed from the store on each call.

use chrono::Duration;
use std::sync::Arc;

use crate::error::{AssistantError, Result, StoreError};
use crate::ledger::{LedgerFilter, LedgerStore, TransactionType, TypeAggregate};
use crate::utils::{local_day_bounds, parse_business_date, today};

/// Trailing-week exposure summary. Payments are excluded from every field:
/// this reports exposure, not net position.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekSummary {
    pub total_sales: f64,
    pub transaction_count: u64,
    pub total_credit: f64,
}

#[derive(Clone)]
pub struct LedgerQueryEngine {
    store: Arc<dyn LedgerStore>,
}

impl LedgerQueryEngine {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Sum of sale amounts recorded within the current local day.
    pub async fn today_sales(&self, owner_id: &str) -> Result<f64> {
        let (start, end) = local_day_bounds(today());
        let filter = LedgerFilter::for_owner(owner_id)
            .entry_type(TransactionType::Sale)
            .recorded_between(start, end);
        self.store.sum_amount(&filter).await.map_err(query_failed)
    }

    /// Outstanding credit for one person: credits minus payments, exact name
    /// match. Zero for an unknown person; "no record" and "fully settled"
    /// are indistinguishable by design.
    pub async fn person_credit(&self, owner_id: &str, person: &str) -> Result<f64> {
        let filter = LedgerFilter::for_owner(owner_id)
            .entry_type(TransactionType::Credit)
            .entry_type(TransactionType::Payment)
            .person(person);
        let groups = self
            .store
            .group_sum_count(&filter)
            .await
            .map_err(query_failed)?;
        Ok(group_total(&groups, TransactionType::Credit)
            - group_total(&groups, TransactionType::Payment))
    }

    /// Aggregates over entries recorded in the trailing seven days.
    pub async fn week_summary(&self, owner_id: &str) -> Result<WeekSummary> {
        let (week_start, _) = local_day_bounds(today() - Duration::days(7));
        let (_, day_end) = local_day_bounds(today());
        let filter = LedgerFilter::for_owner(owner_id).recorded_between(week_start, day_end);
        let groups = self
            .store
            .group_sum_count(&filter)
            .await
            .map_err(query_failed)?;

        let sales = groups
            .iter()
            .find(|g| g.entry_type == TransactionType::Sale);
        Ok(WeekSummary {
            total_sales: sales.map(|g| g.total).unwrap_or(0.0),
            transaction_count: sales.map(|g| g.count).unwrap_or(0),
            total_credit: group_total(&groups, TransactionType::Credit),
        })
    }

    /// Sum of sale amounts whose business date falls on the named calendar
    /// day (`"today"` resolves to the current day).
    pub async fn sales_by_date(&self, owner_id: &str, date: &str) -> Result<f64> {
        let day = parse_business_date(Some(date));
        let filter = LedgerFilter::for_owner(owner_id)
            .entry_type(TransactionType::Sale)
            .occurred_between(day, day + Duration::days(1));
        self.store.sum_amount(&filter).await.map_err(query_failed)
    }
}

fn group_total(groups: &[TypeAggregate], entry_type: TransactionType) -> f64 {
    groups
        .iter()
        .find(|g| g.entry_type == entry_type)
        .map(|g| g.total)
        .unwrap_or(0.0)
}

fn query_failed(error: StoreError) -> AssistantError {
    AssistantError::QueryFailed(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{LedgerEntry, MemoryLedger};
    use chrono::Utc;

    fn engine() -> (LedgerQueryEngine, Arc<MemoryLedger>) {
        let store = Arc::new(MemoryLedger::new());
        (LedgerQueryEngine::new(store.clone()), store)
    }

    async fn append(
        store: &MemoryLedger,
        owner: &str,
        entry_type: TransactionType,
        amount: f64,
        person: Option<&str>,
    ) {
        store
            .append(LedgerEntry {
                owner_id: owner.to_string(),
                entry_type,
                item: None,
                qty: None,
                amount,
                person_name: person.map(|p| p.to_string()),
                occurred_on: today(),
                recorded_at: Utc::now(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_today_sales_sums_only_sales() {
        let (engine, store) = engine();
        append(&store, "shop", TransactionType::Sale, 100.0, None).await;
        append(&store, "shop", TransactionType::Sale, 40.0, None).await;
        append(&store, "shop", TransactionType::Credit, 500.0, Some("Rahul")).await;

        assert_eq!(engine.today_sales("shop").await.unwrap(), 140.0);
    }

    #[tokio::test]
    async fn test_today_sales_empty_is_zero() {
        let (engine, _store) = engine();
        assert_eq!(engine.today_sales("shop").await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_person_credit_is_linear() {
        let (engine, store) = engine();
        append(&store, "shop", TransactionType::Credit, 500.0, Some("Rahul")).await;
        append(&store, "shop", TransactionType::Payment, 200.0, Some("Rahul")).await;

        assert_eq!(engine.person_credit("shop", "Rahul").await.unwrap(), 300.0);
    }

    #[tokio::test]
    async fn test_person_credit_cross_person_isolation() {
        let (engine, store) = engine();
        append(&store, "shop", TransactionType::Credit, 500.0, Some("Rahul")).await;
        append(&store, "shop", TransactionType::Credit, 80.0, Some("Sita")).await;
        append(&store, "shop", TransactionType::Payment, 80.0, Some("Sita")).await;

        assert_eq!(engine.person_credit("shop", "Rahul").await.unwrap(), 500.0);
        assert_eq!(engine.person_credit("shop", "Sita").await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_person_credit_unknown_person_is_zero() {
        let (engine, _store) = engine();
        assert_eq!(engine.person_credit("shop", "Ghost").await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_person_credit_can_go_negative() {
        let (engine, store) = engine();
        append(&store, "shop", TransactionType::Payment, 150.0, Some("Rahul")).await;
        assert_eq!(engine.person_credit("shop", "Rahul").await.unwrap(), -150.0);
    }

    #[tokio::test]
    async fn test_week_summary_excludes_payments() {
        let (engine, store) = engine();
        append(&store, "shop", TransactionType::Sale, 100.0, None).await;
        append(&store, "shop", TransactionType::Credit, 50.0, Some("Rahul")).await;
        append(&store, "shop", TransactionType::Payment, 30.0, Some("Rahul")).await;

        let summary = engine.week_summary("shop").await.unwrap();
        assert_eq!(
            summary,
            WeekSummary {
                total_sales: 100.0,
                transaction_count: 1,
                total_credit: 50.0,
            }
        );
    }

    #[tokio::test]
    async fn test_sales_by_date_today_equals_today_sales() {
        let (engine, store) = engine();
        append(&store, "shop", TransactionType::Sale, 75.0, None).await;
        append(&store, "shop", TransactionType::Sale, 25.0, None).await;

        let by_date = engine.sales_by_date("shop", "today").await.unwrap();
        let today_total = engine.today_sales("shop").await.unwrap();
        assert_eq!(by_date, today_total);
        assert_eq!(by_date, 100.0);
    }

    #[tokio::test]
    async fn test_sales_by_date_scopes_to_named_day() {
        let (engine, store) = engine();
        append(&store, "shop", TransactionType::Sale, 100.0, None).await;

        let other_day = engine.sales_by_date("shop", "2020-01-01").await.unwrap();
        assert_eq!(other_day, 0.0);
    }

    #[tokio::test]
    async fn test_queries_scope_to_owner() {
        let (engine, store) = engine();
        append(&store, "shop-a", TransactionType::Sale, 100.0, None).await;
        append(&store, "shop-b", TransactionType::Sale, 40.0, None).await;

        assert_eq!(engine.today_sales("shop-a").await.unwrap(), 100.0);
        assert_eq!(engine.today_sales("shop-b").await.unwrap(), 40.0);
    }
}
