use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::analytics::filters::ReportFilter;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::reports::models::{NewReport, Report, ReportCounts, ReportStatus};
use crate::features::reports::repositories::ReportRepository;
use crate::shared::constants::MAX_PAGE_SIZE;

/// One page of a filtered listing
#[derive(Debug, Clone)]
pub struct ReportPage {
    pub reports: Vec<Report>,
    /// Matching reports before paging
    pub total: usize,
}

/// Service for the report lifecycle and read queries
pub struct ReportService {
    reports: Arc<dyn ReportRepository>,
}

impl ReportService {
    pub fn new(reports: Arc<dyn ReportRepository>) -> Self {
        Self { reports }
    }

    /// Persist a new report. It always starts out PENDING.
    pub async fn create(&self, data: NewReport) -> Result<Report> {
        let report = Report::from_new(data, Utc::now());
        let report = self.reports.insert(&report).await?;

        tracing::info!(
            "Created report: {} (category: {})",
            report.id,
            report.category
        );

        Ok(report)
    }

    /// Move a report to any status, including back to PENDING
    pub async fn set_status(
        &self,
        actor: &AuthenticatedUser,
        id: Uuid,
        status: ReportStatus,
    ) -> Result<Report> {
        actor.require_admin()?;

        let report = self
            .reports
            .update_status(id, status, Utc::now())
            .await?
            .ok_or_else(|| report_not_found(id))?;

        tracing::info!(
            "Report {} set to {} by {}",
            report.id,
            report.status,
            actor.user_id
        );

        Ok(report)
    }

    /// Hard delete. Deleting twice fails with `NotFound`.
    pub async fn delete(&self, actor: &AuthenticatedUser, id: Uuid) -> Result<()> {
        actor.require_admin()?;

        if !self.reports.delete(id).await? {
            return Err(report_not_found(id));
        }

        tracing::info!("Report {} deleted by {}", id, actor.user_id);
        Ok(())
    }

    /// Public view: VERIFIED reports, newest first
    pub async fn list_verified(&self) -> Result<Vec<Report>> {
        self.reports.list(Some(ReportStatus::Verified)).await
    }

    /// Public view narrowed by category, dates and text, then paged
    pub async fn search_verified(
        &self,
        filter: &ReportFilter,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<ReportPage> {
        let matching = filter.apply(self.list_verified().await?);
        let total = matching.len();

        let offset = usize::try_from(offset.unwrap_or(0).max(0)).unwrap_or(0);
        let limit = match limit {
            Some(limit) => usize::try_from(limit.clamp(1, MAX_PAGE_SIZE)).unwrap_or(1),
            None => total,
        };

        Ok(ReportPage {
            reports: matching.into_iter().skip(offset).take(limit).collect(),
            total,
        })
    }

    /// Moderation view: every report, optionally one status only
    pub async fn list_all(
        &self,
        actor: &AuthenticatedUser,
        status: Option<ReportStatus>,
    ) -> Result<Vec<Report>> {
        actor.require_admin()?;
        self.reports.list(status).await
    }

    /// Any report by id, whatever its status
    pub async fn get_by_id(&self, id: Uuid) -> Result<Report> {
        self.reports
            .find_by_id(id)
            .await?
            .ok_or_else(|| report_not_found(id))
    }

    pub async fn stats(&self, actor: &AuthenticatedUser) -> Result<ReportCounts> {
        actor.require_admin()?;
        self.reports.counts().await
    }
}

fn report_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Report {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::analytics::filters::DateRange;
    use crate::shared::test_helpers::{admin_identity, new_report, test_report_service, user_identity};
    use tokio_test::{assert_err, assert_ok};

    #[tokio::test]
    async fn test_created_reports_are_pending() {
        let service = test_report_service();

        let report = service.create(new_report("Bike stolen", "theft")).await.unwrap();

        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.created_at, report.updated_at);
        assert_eq!(service.get_by_id(report.id).await.unwrap(), report);
    }

    #[tokio::test]
    async fn test_list_verified_is_subset_of_list_all() {
        let service = test_report_service();
        let admin = admin_identity();

        let a = service.create(new_report("A", "theft")).await.unwrap();
        let b = service.create(new_report("B", "fraud")).await.unwrap();
        let c = service.create(new_report("C", "other")).await.unwrap();
        service.set_status(&admin, a.id, ReportStatus::Verified).await.unwrap();
        service.set_status(&admin, c.id, ReportStatus::Rejected).await.unwrap();

        let verified = service.list_verified().await.unwrap();
        let all = service.list_all(&admin, None).await.unwrap();

        assert_eq!(verified.len(), 1);
        assert_eq!(verified[0].id, a.id);
        assert_eq!(all.len(), 3);
        assert!(verified.iter().all(|v| all.iter().any(|r| r.id == v.id)));
        assert!(all
            .iter()
            .filter(|r| r.status == ReportStatus::Verified)
            .all(|r| verified.iter().any(|v| v.id == r.id)));

        let pending = service
            .list_all(&admin, Some(ReportStatus::Pending))
            .await
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, b.id);
    }

    #[tokio::test]
    async fn test_set_status_is_visible_through_get_by_id() {
        let service = test_report_service();
        let admin = admin_identity();
        let report = service.create(new_report("A", "theft")).await.unwrap();

        for status in [
            ReportStatus::Verified,
            ReportStatus::Rejected,
            ReportStatus::Pending,
            ReportStatus::Pending,
        ] {
            service.set_status(&admin, report.id, status).await.unwrap();
            assert_eq!(service.get_by_id(report.id).await.unwrap().status, status);
        }
    }

    #[tokio::test]
    async fn test_set_status_unknown_id_is_not_found() {
        let service = test_report_service();
        let result = service
            .set_status(&admin_identity(), Uuid::now_v7(), ReportStatus::Verified)
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let service = test_report_service();
        let admin = admin_identity();
        let report = service.create(new_report("A", "theft")).await.unwrap();

        assert_ok!(service.delete(&admin, report.id).await);

        assert!(matches!(
            service.get_by_id(report.id).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(&admin, report.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_stats_total_is_sum_of_statuses() {
        let service = test_report_service();
        let admin = admin_identity();
        for i in 0..5 {
            let report = service.create(new_report("R", "theft")).await.unwrap();
            let status = match i % 3 {
                0 => ReportStatus::Verified,
                1 => ReportStatus::Rejected,
                _ => continue,
            };
            service.set_status(&admin, report.id, status).await.unwrap();
        }

        let stats = service.stats(&admin).await.unwrap();

        assert_eq!(stats.total, 5);
        assert_eq!(stats.total, stats.verified + stats.pending + stats.rejected);
        assert_eq!(stats.verified, 2);
        assert_eq!(stats.rejected, 2);
        assert_eq!(stats.pending, 1);
    }

    #[tokio::test]
    async fn test_admin_operations_refuse_regular_users() {
        let service = test_report_service();
        let user = user_identity();
        let report = service.create(new_report("A", "theft")).await.unwrap();

        assert!(matches!(
            service.set_status(&user, report.id, ReportStatus::Verified).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            service.delete(&user, report.id).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            service.list_all(&user, None).await,
            Err(AppError::Forbidden(_))
        ));
        assert_err!(service.stats(&user).await);

        // Nothing changed
        assert_eq!(
            service.get_by_id(report.id).await.unwrap().status,
            ReportStatus::Pending
        );
    }

    #[tokio::test]
    async fn test_search_verified_filters_and_pages() {
        let service = test_report_service();
        let admin = admin_identity();
        for (title, category) in [
            ("Bike stolen", "theft"),
            ("Wallet stolen", "theft"),
            ("Phone stolen", "theft"),
            ("Graffiti", "vandalism"),
        ] {
            let report = service.create(new_report(title, category)).await.unwrap();
            service
                .set_status(&admin, report.id, ReportStatus::Verified)
                .await
                .unwrap();
        }
        service.create(new_report("Car stolen", "theft")).await.unwrap();

        let filter = ReportFilter {
            categories: vec!["theft".to_string()],
            range: DateRange::default(),
            search: Some("stolen".to_string()),
        };

        let page = service.search_verified(&filter, Some(2), Some(0)).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.reports.len(), 2);

        let rest = service.search_verified(&filter, Some(2), Some(2)).await.unwrap();
        assert_eq!(rest.total, 3);
        assert_eq!(rest.reports.len(), 1);

        let everything = service
            .search_verified(&ReportFilter::default(), None, None)
            .await
            .unwrap();
        assert_eq!(everything.total, 4);
        assert_eq!(everything.reports.len(), 4);
    }
}
