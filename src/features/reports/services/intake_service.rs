use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::{NewReport, Report};
use crate::features::reports::services::ReportService;
use crate::modules::storage::PhotoStorage;
use crate::shared::constants::ALLOWED_PHOTO_TYPES;
use crate::shared::validation::CATEGORY_REGEX;

/// Form fields exactly as submitted, before any coercion
#[derive(Debug, Clone, Default)]
pub struct RawReportSubmission {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub address: Option<String>,
    pub contact_info: Option<String>,
}

impl RawReportSubmission {
    /// Record one text field of the intake form.
    ///
    /// `status` is accepted and dropped: new reports are always PENDING.
    pub fn set_field(&mut self, name: &str, value: String) -> Result<()> {
        let slot = match name {
            "title" => &mut self.title,
            "description" => &mut self.description,
            "category" => &mut self.category,
            "latitude" => &mut self.latitude,
            "longitude" => &mut self.longitude,
            "address" => &mut self.address,
            "contactInfo" => &mut self.contact_info,
            "status" => {
                tracing::debug!("Ignoring client-supplied status '{}'", value);
                return Ok(());
            }
            other => {
                return Err(AppError::Validation(format!(
                    "Unknown field '{}'",
                    other
                )))
            }
        };
        *slot = Some(value);
        Ok(())
    }
}

/// Uploaded photo as received
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// Submission after trimming and type coercion, ready for field rules
#[derive(Debug, Validate)]
struct ReportInput {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    title: String,

    #[validate(length(max = 5000, message = "Description must not exceed 5000 characters"))]
    description: Option<String>,

    #[validate(
        length(min = 1, max = 50, message = "Category must be 1-50 characters"),
        regex(
            path = *CATEGORY_REGEX,
            message = "Category may only contain letters, digits, spaces, '_' and '-'"
        )
    )]
    category: String,

    latitude: f64,
    longitude: f64,

    #[validate(length(max = 500, message = "Address must not exceed 500 characters"))]
    address: Option<String>,

    #[validate(length(max = 200, message = "Contact info must not exceed 200 characters"))]
    contact_info: Option<String>,
}

impl ReportInput {
    fn from_raw(raw: RawReportSubmission) -> Result<Self> {
        let input = Self {
            title: required(raw.title, "Title")?,
            description: optional(raw.description),
            category: required(raw.category, "Category")?.to_lowercase(),
            latitude: coordinate(raw.latitude, "Latitude")?,
            longitude: coordinate(raw.longitude, "Longitude")?,
            address: optional(raw.address),
            contact_info: optional(raw.contact_info),
        };

        input
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        Ok(input)
    }

    fn into_new_report(self, photo_url: Option<String>) -> NewReport {
        NewReport {
            title: self.title,
            description: self.description,
            category: self.category,
            latitude: self.latitude,
            longitude: self.longitude,
            address: self.address,
            contact_info: self.contact_info,
            photo_url,
        }
    }
}

/// Trimmed value, absent when blank
fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, field: &str) -> Result<String> {
    optional(value).ok_or_else(|| AppError::Validation(format!("{} is required", field)))
}

fn coordinate(value: Option<String>, field: &str) -> Result<f64> {
    let value = required(value, field)?;
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::Validation(format!("{} must be a number, got '{}'", field, value)))
}

/// Turns raw form submissions into stored PENDING reports
pub struct IntakeService {
    reports: Arc<ReportService>,
    storage: Arc<PhotoStorage>,
    max_photo_size: usize,
}

impl IntakeService {
    pub fn new(reports: Arc<ReportService>, storage: Arc<PhotoStorage>, max_photo_size: usize) -> Self {
        Self {
            reports,
            storage,
            max_photo_size,
        }
    }

    /// Validate everything first, then write the photo, then persist.
    /// The photo is removed again if the report cannot be saved.
    pub async fn submit(
        &self,
        raw: RawReportSubmission,
        photo: Option<PhotoUpload>,
    ) -> Result<Report> {
        let input = ReportInput::from_raw(raw)?;

        // Browsers send an empty part when no file was chosen
        let photo = photo.filter(|p| !p.data.is_empty());
        if let Some(photo) = &photo {
            self.check_photo(photo)?;
        }

        let stored = match &photo {
            Some(photo) => Some(
                self.storage
                    .store(photo.file_name.as_deref(), &photo.data)
                    .await?,
            ),
            None => None,
        };

        let new_report = input.into_new_report(stored.as_ref().map(|p| p.url.clone()));

        match self.reports.create(new_report).await {
            Ok(report) => Ok(report),
            Err(e) => {
                if let Some(stored) = stored {
                    tracing::error!(
                        "Report not saved, removing orphaned photo '{}'",
                        stored.file_name
                    );
                    self.storage.remove(&stored.file_name).await;
                }
                Err(e)
            }
        }
    }

    fn check_photo(&self, photo: &PhotoUpload) -> Result<()> {
        let content_type = photo
            .content_type
            .as_deref()
            .map(|ct| ct.trim().to_lowercase())
            .unwrap_or_default();

        if !ALLOWED_PHOTO_TYPES.contains(&content_type.as_str()) {
            return Err(AppError::Validation(format!(
                "Photo must be one of {}, got '{}'",
                ALLOWED_PHOTO_TYPES.join(", "),
                content_type
            )));
        }

        if photo.data.len() > self.max_photo_size {
            return Err(AppError::PayloadTooLarge(format!(
                "Photo must not exceed {} bytes",
                self.max_photo_size
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::reports::models::{ReportCounts, ReportStatus};
    use crate::features::reports::repositories::{InMemoryReportRepository, ReportRepository};
    use crate::shared::test_helpers::{admin_identity, TempUploadDir};
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    fn bike_stolen() -> RawReportSubmission {
        RawReportSubmission {
            title: Some("Bike stolen".to_string()),
            description: Some("".to_string()),
            category: Some(" Theft ".to_string()),
            latitude: Some("40.71".to_string()),
            longitude: Some("-74.00".to_string()),
            address: Some("  ".to_string()),
            contact_info: None,
        }
    }

    fn png(data: &[u8]) -> PhotoUpload {
        PhotoUpload {
            file_name: Some("IMG_0001.PNG".to_string()),
            content_type: Some("image/png".to_string()),
            data: data.to_vec(),
        }
    }

    struct Fixture {
        intake: IntakeService,
        reports: Arc<ReportService>,
        storage: Arc<PhotoStorage>,
        _dir: TempUploadDir,
    }

    async fn fixture_with(repo: Arc<dyn ReportRepository>) -> Fixture {
        let reports = Arc::new(ReportService::new(repo));
        let dir = TempUploadDir::new();
        let storage = Arc::new(PhotoStorage::new(dir.path().to_path_buf()));
        storage.ensure_dir().await.unwrap();
        Fixture {
            intake: IntakeService::new(reports.clone(), storage.clone(), 1024),
            reports,
            storage,
            _dir: dir,
        }
    }

    async fn fixture() -> Fixture {
        fixture_with(Arc::new(InMemoryReportRepository::new())).await
    }

    async fn stored_files(storage: &PhotoStorage) -> usize {
        let mut count = 0;
        if let Ok(mut entries) = tokio::fs::read_dir(storage.dir()).await {
            while let Ok(Some(_)) = entries.next_entry().await {
                count += 1;
            }
        }
        count
    }

    #[tokio::test]
    async fn test_submit_normalizes_fields() {
        let f = fixture().await;

        let report = f.intake.submit(bike_stolen(), None).await.unwrap();

        assert_eq!(report.status, ReportStatus::Pending);
        assert_eq!(report.category, "theft");
        assert_eq!(report.latitude, 40.71);
        assert_eq!(report.longitude, -74.0);
        assert_eq!(report.description, None);
        assert_eq!(report.address, None);
        assert_eq!(report.photo_url, None);
    }

    #[tokio::test]
    async fn test_status_field_is_ignored() {
        let mut raw = bike_stolen();
        raw.set_field("status", "VERIFIED".to_string()).unwrap();

        let report = fixture().await.intake.submit(raw, None).await.unwrap();
        assert_eq!(report.status, ReportStatus::Pending);
    }

    #[tokio::test]
    async fn test_unknown_field_is_rejected() {
        let mut raw = bike_stolen();
        assert!(matches!(
            raw.set_field("verifiedBy", "me".to_string()),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_non_numeric_latitude_persists_nothing() {
        let f = fixture().await;
        let mut raw = bike_stolen();
        raw.latitude = Some("abc".to_string());

        let result = f.intake.submit(raw, Some(png(b"img"))).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(f
            .reports
            .list_all(&admin_identity(), None)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(stored_files(&f.storage).await, 0);
    }

    #[tokio::test]
    async fn test_rejects_non_finite_and_missing_coordinates() {
        let f = fixture().await;
        for latitude in [Some("NaN"), Some("inf"), Some(""), None] {
            let mut raw = bike_stolen();
            raw.latitude = latitude.map(str::to_string);
            assert!(matches!(
                f.intake.submit(raw, None).await,
                Err(AppError::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_field_rules() {
        let f = fixture().await;

        let mut no_title = bike_stolen();
        no_title.title = Some("   ".to_string());
        let mut long_title = bike_stolen();
        long_title.title = Some("x".repeat(201));
        let mut bad_category = bike_stolen();
        bad_category.category = Some("theft<script>".to_string());

        for raw in [no_title, long_title, bad_category] {
            assert!(matches!(
                f.intake.submit(raw, None).await,
                Err(AppError::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_photo_is_stored_under_generated_name() {
        let f = fixture().await;

        let report = f
            .intake
            .submit(bike_stolen(), Some(png(b"png bytes")))
            .await
            .unwrap();

        let url = report.photo_url.unwrap();
        let file_name = url.strip_prefix("/uploads/").unwrap();
        assert!(file_name.ends_with(".png"));
        assert!(!file_name.contains("IMG_0001"));
        assert_eq!(
            tokio::fs::read(f.storage.dir().join(file_name)).await.unwrap(),
            b"png bytes"
        );
    }

    #[tokio::test]
    async fn test_empty_photo_part_counts_as_no_photo() {
        let report = fixture()
            .await
            .intake
            .submit(bike_stolen(), Some(png(b"")))
            .await
            .unwrap();
        assert_eq!(report.photo_url, None);
    }

    #[tokio::test]
    async fn test_rejects_wrong_type_and_oversized_photos() {
        let f = fixture().await;
        let mut pdf = png(b"%PDF");
        pdf.content_type = Some("application/pdf".to_string());

        assert!(matches!(
            f.intake.submit(bike_stolen(), Some(pdf)).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            f.intake.submit(bike_stolen(), Some(png(&[0u8; 2048]))).await,
            Err(AppError::PayloadTooLarge(_))
        ));
        assert_eq!(stored_files(&f.storage).await, 0);
    }

    struct FailingRepository;

    #[async_trait]
    impl ReportRepository for FailingRepository {
        async fn insert(&self, _report: &Report) -> Result<Report> {
            Err(AppError::Internal("disk full".to_string()))
        }

        async fn find_by_id(&self, _id: Uuid) -> Result<Option<Report>> {
            Ok(None)
        }

        async fn list(&self, _status: Option<ReportStatus>) -> Result<Vec<Report>> {
            Ok(Vec::new())
        }

        async fn update_status(
            &self,
            _id: Uuid,
            _status: ReportStatus,
            _updated_at: DateTime<Utc>,
        ) -> Result<Option<Report>> {
            Ok(None)
        }

        async fn delete(&self, _id: Uuid) -> Result<bool> {
            Ok(false)
        }

        async fn counts(&self) -> Result<ReportCounts> {
            Ok(ReportCounts::default())
        }
    }

    #[tokio::test]
    async fn test_photo_is_removed_when_saving_fails() {
        let f = fixture_with(Arc::new(FailingRepository)).await;

        let result = f.intake.submit(bike_stolen(), Some(png(b"img"))).await;

        assert!(matches!(result, Err(AppError::Internal(_))));
        assert_eq!(stored_files(&f.storage).await, 0);
    }
}
