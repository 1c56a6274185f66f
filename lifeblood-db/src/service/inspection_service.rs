use chrono::{SubsecRound, Utc};
use lifeblood_api::{
    ApiError, ApiResult, AuditReport, AuditStamp, EditRequest, InspectionRecord, SubmissionSummary,
    SubmitRequest,
};
use sqlx::Database;
use std::error::Error;
use std::sync::Arc;
use tracing::{error, info, warn};
use validator::Validate;

use crate::models::inspection::InspectionModel;
use crate::repository::{
    Create, FindById, FindDuplicate, InspectionRepository, ListPage, LoadAudits, Page,
    PageRequest, Summarize, UpdateAudited,
};

/// Keeps typed errors raised by a repository, wraps anything else with `fallback`.
fn from_repository(
    e: Box<dyn Error + Send + Sync>,
    fallback: fn(String) -> ApiError,
) -> ApiError {
    match e.downcast::<ApiError>() {
        Ok(api_error) => *api_error,
        Err(other) => fallback(other.to_string()),
    }
}

/// Submit, edit and browse workflows over an inspection repository
pub struct InspectionService<DB: Database> {
    repository: Arc<dyn InspectionRepository<DB>>,
}

impl<DB: Database> Clone for InspectionService<DB> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
        }
    }
}

impl<DB: Database> InspectionService<DB> {
    pub fn new(repository: Arc<dyn InspectionRepository<DB>>) -> Self {
        Self { repository }
    }

    fn effective_user<'a>(resolved: &'a str, submitted_as: &'a Option<String>) -> &'a str {
        match submitted_as {
            Some(other) if other != resolved => {
                info!("{resolved} is acting on behalf of {other}");
                other
            }
            _ => resolved,
        }
    }

    /// Validates and stores a new submission unless the same inspection was
    /// already recorded.
    ///
    /// A failing duplicate lookup does not block the submission.
    pub async fn submit(
        &self,
        request: SubmitRequest,
        resolved_email: &str,
    ) -> ApiResult<InspectionRecord> {
        request.validate()?;
        let user_email = Self::effective_user(resolved_email, &request.submitted_as);

        match self.repository.find_duplicate(&request.form).await {
            Ok(Some(existing)) => {
                warn!(
                    "Rejected duplicate of record {} submitted by {}",
                    existing.id, existing.user_email
                );
                return Err(ApiError::DuplicateSubmission(existing));
            }
            Ok(None) => {}
            Err(e) => {
                let absorbed = from_repository(e, ApiError::LookupFailure);
                warn!("Accepting submission without duplicate check: {absorbed}");
            }
        }

        let model = InspectionModel::new_submission(&request.form, user_email, Utc::now())?;
        let saved = self.repository.create(model).await.map_err(|e| {
            error!("Failed to store submission from {user_email}: {e}");
            from_repository(e, ApiError::WriteFailure)
        })?;

        info!("Stored inspection {} from {}", saved.id, saved.user_email);
        Ok(saved.to_record())
    }

    /// Applies an edit, stamping it with the editor and reason, and reports
    /// what changed.
    pub async fn edit(
        &self,
        id: i64,
        request: EditRequest,
        resolved_email: &str,
    ) -> ApiResult<AuditReport> {
        request.validate()?;
        let modified_by = Self::effective_user(resolved_email, &request.submitted_as);

        let original = self
            .repository
            .find_by_id(id)
            .await
            .map_err(|e| from_repository(e, ApiError::DatabaseError))?
            .ok_or_else(|| ApiError::NotFound(format!("inspection {id}")))?;

        let stamp = AuditStamp {
            last_modified_time: Utc::now().trunc_subsecs(6),
            last_modified_by: modified_by.to_string(),
            edit_reason: request.edit_reason.trim().to_string(),
        };
        let mut changed = original.clone();
        changed.apply_edit(&request.form, &stamp)?;

        let saved = self.repository.update(changed).await.map_err(|e| {
            error!("Failed to store edit of inspection {id}: {e}");
            from_repository(e, ApiError::WriteFailure)
        })?;

        let report = AuditReport::build(&original.to_record(), &saved.to_record())?;
        if report.no_changes {
            warn!("Edit of inspection {id} by {modified_by} changed no field");
        } else {
            info!(
                "Inspection {id} edited by {modified_by}: {}",
                report.diff.summary_lines().join("; ")
            );
        }
        Ok(report)
    }

    pub async fn get(&self, id: i64) -> ApiResult<InspectionRecord> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(|e| from_repository(e, ApiError::DatabaseError))?
            .map(|model| model.to_record())
            .ok_or_else(|| ApiError::NotFound(format!("inspection {id}")))
    }

    /// Stored records, newest submission first
    pub async fn list(&self, page: PageRequest) -> ApiResult<Page<InspectionRecord>> {
        let page = self
            .repository
            .list(page.clamped())
            .await
            .map_err(|e| from_repository(e, ApiError::DatabaseError))?;
        Ok(page.map(|model| model.to_record()))
    }

    /// Every stored version of a record, newest first
    pub async fn history(
        &self,
        id: i64,
        page: PageRequest,
    ) -> ApiResult<Page<InspectionRecord>> {
        let page = self
            .repository
            .load_audits(id, page.clamped())
            .await
            .map_err(|e| from_repository(e, ApiError::DatabaseError))?;
        if page.total == 0 {
            return Err(ApiError::NotFound(format!("inspection {id}")));
        }
        Ok(page.map(|model| model.to_record()))
    }

    pub async fn summary(&self) -> ApiResult<SubmissionSummary> {
        self.repository
            .summarize()
            .await
            .map_err(|e| from_repository(e, ApiError::DatabaseError))
    }
}
