//! Process-lifetime query store.

use async_trait::async_trait;
use chrono::Utc;
use council_application::{QueryStore, StoreError, StoredQuery};
use council_domain::CouncilResult;
use parking_lot::Mutex;
use std::collections::HashMap;
use uuid::Uuid;

/// Records keyed by record id, checked against the tenant on read.
#[derive(Default)]
pub struct InMemoryQueryStore {
    records: Mutex<HashMap<String, StoredQuery>>,
}

impl InMemoryQueryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl QueryStore for InMemoryQueryStore {
    async fn save_query(
        &self,
        query: &str,
        result: &CouncilResult,
        domain: &str,
        tenant_id: &str,
    ) -> Result<String, StoreError> {
        let record = StoredQuery {
            record_id: Uuid::new_v4().to_string(),
            tenant_id: tenant_id.to_string(),
            domain: domain.to_string(),
            query: query.to_string(),
            result: result.clone(),
            created_at: Utc::now(),
        };
        let record_id = record.record_id.clone();
        self.records.lock().insert(record_id.clone(), record);
        Ok(record_id)
    }

    async fn get_query(
        &self,
        record_id: &str,
        tenant_id: &str,
    ) -> Result<Option<StoredQuery>, StoreError> {
        Ok(self
            .records
            .lock()
            .get(record_id)
            .filter(|r| r.tenant_id == tenant_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use council_domain::{CouncilMember, CouncilOpinion, Query};
    use std::collections::BTreeMap;

    fn sample_result() -> CouncilResult {
        let member = CouncilMember::new("a", "x/a", "Advisor A", "p");
        let opinions = BTreeMap::from([(
            "a".to_string(),
            CouncilOpinion::success(&member, "looks fine"),
        )]);
        CouncilResult::new(&Query::try_new("Should we extend hours?").unwrap(), opinions)
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let store = InMemoryQueryStore::new();
        let result = sample_result();
        let id = store
            .save_query(&result.query, &result, "healthcare", "mercy")
            .await
            .unwrap();

        let record = store.get_query(&id, "mercy").await.unwrap().unwrap();
        assert_eq!(record.result, result);
        assert_eq!(record.domain, "healthcare");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_other_tenant_cannot_read() {
        let store = InMemoryQueryStore::new();
        let result = sample_result();
        let id = store
            .save_query(&result.query, &result, "healthcare", "mercy")
            .await
            .unwrap();

        assert!(store.get_query(&id, "lakeside").await.unwrap().is_none());
        assert!(store.get_query("missing", "mercy").await.unwrap().is_none());
    }
}
