use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::ReportRepository;
use crate::core::error::Result;
use crate::features::reports::models::{Report, ReportCounts, ReportStatus};

#[derive(Default)]
pub struct InMemoryReportRepository {
    reports: RwLock<HashMap<Uuid, Report>>,
}

impl InMemoryReportRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportRepository {
    async fn insert(&self, report: &Report) -> Result<Report> {
        self.reports
            .write()
            .await
            .insert(report.id, report.clone());
        Ok(report.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Report>> {
        Ok(self.reports.read().await.get(&id).cloned())
    }

    async fn list(&self, status: Option<ReportStatus>) -> Result<Vec<Report>> {
        let mut reports: Vec<Report> = self
            .reports
            .read()
            .await
            .values()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();

        // Same ordering as the postgres store: newest first, id breaks ties
        reports.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        Ok(reports)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ReportStatus,
        updated_at: DateTime<Utc>,
    ) -> Result<Option<Report>> {
        let mut reports = self.reports.write().await;
        Ok(reports.get_mut(&id).map(|report| {
            report.status = status;
            report.updated_at = updated_at;
            report.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.reports.write().await.remove(&id).is_some())
    }

    async fn counts(&self) -> Result<ReportCounts> {
        Ok(ReportCounts::tally(self.reports.read().await.values()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::report_at;
    use chrono::TimeZone;

    #[tokio::test]
    async fn test_list_is_newest_first_and_filters_status() {
        let repo = InMemoryReportRepository::new();
        let older = report_at(Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap());
        let mut newer = report_at(Utc.with_ymd_and_hms(2024, 6, 2, 8, 0, 0).unwrap());
        newer.status = ReportStatus::Verified;

        repo.insert(&older).await.unwrap();
        repo.insert(&newer).await.unwrap();

        let all = repo.list(None).await.unwrap();
        assert_eq!(
            all.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![newer.id, older.id]
        );

        let verified = repo.list(Some(ReportStatus::Verified)).await.unwrap();
        assert_eq!(verified.len(), 1);
        assert_eq!(verified[0].id, newer.id);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id() {
        let repo = InMemoryReportRepository::new();
        let id = Uuid::now_v7();

        assert!(repo
            .update_status(id, ReportStatus::Verified, Utc::now())
            .await
            .unwrap()
            .is_none());
        assert!(!repo.delete(id).await.unwrap());
    }

    #[tokio::test]
    async fn test_counts() {
        let repo = InMemoryReportRepository::new();
        for status in [
            ReportStatus::Pending,
            ReportStatus::Pending,
            ReportStatus::Verified,
            ReportStatus::Rejected,
        ] {
            let mut report = report_at(Utc::now());
            report.status = status;
            repo.insert(&report).await.unwrap();
        }

        let counts = repo.counts().await.unwrap();
        assert_eq!(
            counts,
            ReportCounts {
                total: 4,
                verified: 1,
                pending: 2,
                rejected: 1,
            }
        );
    }
}
