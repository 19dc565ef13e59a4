use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::drafts::dtos::{ReportDraftDto, TaskDraftDto};
use crate::features::drafts::store::DraftStore;

/// Staging store for in-progress form state, so a page reload does not eat
/// half-written work. Pure UX convenience: nothing here is consulted by the
/// workflow engine, and every entry dies on its own after the TTL.
pub struct DraftService {
    store: Arc<dyn DraftStore>,
    ttl: Duration,
}

impl DraftService {
    pub fn new(store: Arc<dyn DraftStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    fn report_key(user_id: i32) -> String {
        format!("draft:report:{}", user_id)
    }

    fn task_key(user_id: i32, ticket_id: Uuid) -> String {
        format!("draft:tech:{}:{}", user_id, ticket_id)
    }

    /// Save a reporter's report form. Last write wins and resets the TTL.
    pub async fn save_report_draft(&self, user_id: i32, draft: &ReportDraftDto) -> Result<()> {
        let value = serde_json::to_string(draft)
            .map_err(|e| AppError::Internal(format!("Failed to serialize draft: {}", e)))?;

        self.store
            .put(&Self::report_key(user_id), value, self.ttl)
            .await
    }

    pub async fn load_report_draft(&self, user_id: i32) -> Result<Option<ReportDraftDto>> {
        let value = self.store.get(&Self::report_key(user_id)).await?;
        value.map(|v| parse_draft(&v)).transpose()
    }

    pub async fn clear_report_draft(&self, user_id: i32) -> Result<()> {
        self.store.delete(&Self::report_key(user_id)).await
    }

    /// Save a technician's completion form for one task
    pub async fn save_task_draft(
        &self,
        user_id: i32,
        ticket_id: Uuid,
        draft: &TaskDraftDto,
    ) -> Result<()> {
        let value = serde_json::to_string(draft)
            .map_err(|e| AppError::Internal(format!("Failed to serialize draft: {}", e)))?;

        self.store
            .put(&Self::task_key(user_id, ticket_id), value, self.ttl)
            .await
    }

    pub async fn load_task_draft(
        &self,
        user_id: i32,
        ticket_id: Uuid,
    ) -> Result<Option<TaskDraftDto>> {
        let value = self.store.get(&Self::task_key(user_id, ticket_id)).await?;
        value.map(|v| parse_draft(&v)).transpose()
    }

    pub async fn clear_task_draft(&self, user_id: i32, ticket_id: Uuid) -> Result<()> {
        self.store.delete(&Self::task_key(user_id, ticket_id)).await
    }
}

fn parse_draft<T: serde::de::DeserializeOwned>(value: &str) -> Result<T> {
    serde_json::from_str(value)
        .map_err(|e| AppError::Internal(format!("Failed to parse stored draft: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::drafts::store::memory::MemoryDraftStore;
    use crate::features::reports::models::Priority;

    fn service(ttl: Duration) -> DraftService {
        DraftService::new(Arc::new(MemoryDraftStore::new()), ttl)
    }

    fn report_draft(title: &str) -> ReportDraftDto {
        ReportDraftDto {
            title: title.to_string(),
            description: "The projector flickers and dies".to_string(),
            location: "Building A, room 101".to_string(),
            priority: Priority::Medium,
            images: vec![],
        }
    }

    #[tokio::test]
    async fn saved_draft_loads_back() {
        let service = service(Duration::from_secs(60));

        service
            .save_report_draft(1, &report_draft("Projector broken"))
            .await
            .unwrap();

        let loaded = service.load_report_draft(1).await.unwrap().unwrap();
        assert_eq!(loaded, report_draft("Projector broken"));
    }

    #[tokio::test]
    async fn drafts_are_scoped_per_user_and_ticket() {
        let service = service(Duration::from_secs(60));
        let ticket_a = Uuid::new_v4();
        let ticket_b = Uuid::new_v4();

        let draft = TaskDraftDto {
            description: "replaced the compressor".to_string(),
            images: vec!["img/compressor.jpg".to_string()],
        };
        service.save_task_draft(42, ticket_a, &draft).await.unwrap();

        assert!(service
            .load_task_draft(42, ticket_b)
            .await
            .unwrap()
            .is_none());
        assert!(service.load_task_draft(99, ticket_a).await.unwrap().is_none());
        assert_eq!(
            service.load_task_draft(42, ticket_a).await.unwrap(),
            Some(draft)
        );
    }

    #[tokio::test]
    async fn later_save_overwrites_earlier_one() {
        let service = service(Duration::from_secs(60));

        service
            .save_report_draft(1, &report_draft("first"))
            .await
            .unwrap();
        service
            .save_report_draft(1, &report_draft("second"))
            .await
            .unwrap();

        let loaded = service.load_report_draft(1).await.unwrap().unwrap();
        assert_eq!(loaded.title, "second");
    }

    #[tokio::test]
    async fn draft_expires_after_ttl() {
        let service = service(Duration::from_millis(30));

        service
            .save_report_draft(1, &report_draft("short-lived"))
            .await
            .unwrap();
        assert!(service.load_report_draft(1).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert!(service.load_report_draft(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_resets_the_clock() {
        let service = service(Duration::from_millis(80));

        service
            .save_report_draft(1, &report_draft("kept alive"))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        // Saving again pushes expiry out past the original deadline
        service
            .save_report_draft(1, &report_draft("kept alive"))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert!(service.load_report_draft(1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn clear_removes_the_draft() {
        let service = service(Duration::from_secs(60));
        let ticket = Uuid::new_v4();

        let draft = TaskDraftDto {
            description: "swapped the ballast".to_string(),
            images: vec![],
        };
        service.save_task_draft(42, ticket, &draft).await.unwrap();
        service.clear_task_draft(42, ticket).await.unwrap();

        assert!(service.load_task_draft(42, ticket).await.unwrap().is_none());
    }
}
