use crate::core::errors::LedgerError;
use crate::core::models::ActivityEntry;
use crate::infrastructure::logging::ActivityLog;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct InMemoryActivityLog {
    entries: Arc<RwLock<Vec<ActivityEntry>>>,
}

impl InMemoryActivityLog {
    pub fn new() -> Self {
        InMemoryActivityLog {
            entries: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

#[async_trait]
impl ActivityLog for InMemoryActivityLog {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        group_id: Option<&str>,
    ) -> Result<(), LedgerError> {
        let mut entries = self.entries.write().await;
        entries.push(ActivityEntry {
            id: Uuid::new_v4().to_string(),
            action: action.to_string(),
            group_id: group_id.map(String::from),
            details,
            timestamp: chrono::Utc::now(),
        });
        Ok(())
    }

    async fn get_logs(&self) -> Result<Vec<ActivityEntry>, LedgerError> {
        let entries = self.entries.read().await;
        Ok(entries.clone())
    }
}
