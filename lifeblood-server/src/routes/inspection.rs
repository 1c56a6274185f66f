use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};
use lifeblood_api::{AuditReport, EditRequest, InspectionRecord, SubmissionSummary, SubmitRequest};
use lifeblood_db::{Page, PageRequest};

use crate::{errors::Result, middleware::CurrentUser, state::AppState};

pub fn inspection_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_inspections).post(submit_inspection))
        .route("/summary", get(inspection_summary))
        .route("/{id}", get(get_inspection).put(edit_inspection))
        .route("/{id}/history", get(inspection_history))
}

pub async fn submit_inspection(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    payload: core::result::Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<InspectionRecord>)> {
    let Json(request) = payload?;
    let record = state.service.submit(request, &user.email).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn list_inspections(
    State(state): State<AppState>,
    page: core::result::Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<Page<InspectionRecord>>> {
    let Query(page) = page?;
    Ok(Json(state.service.list(page).await?))
}

pub async fn inspection_summary(State(state): State<AppState>) -> Result<Json<SubmissionSummary>> {
    Ok(Json(state.service.summary().await?))
}

pub async fn get_inspection(
    State(state): State<AppState>,
    id: core::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<InspectionRecord>> {
    let Path(id) = id?;
    Ok(Json(state.service.get(id).await?))
}

pub async fn edit_inspection(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    id: core::result::Result<Path<i64>, PathRejection>,
    payload: core::result::Result<Json<EditRequest>, JsonRejection>,
) -> Result<Json<AuditReport>> {
    let Path(id) = id?;
    let Json(request) = payload?;
    Ok(Json(state.service.edit(id, request, &user.email).await?))
}

pub async fn inspection_history(
    State(state): State<AppState>,
    id: core::result::Result<Path<i64>, PathRejection>,
    page: core::result::Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<Page<InspectionRecord>>> {
    let Path(id) = id?;
    let Query(page) = page?;
    Ok(Json(state.service.history(id, page).await?))
}

#[cfg(test)]
mod tests {
    use crate::{app, state::AppState};
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use lifeblood_api::test_utils::sample_form;
    use lifeblood_api::{EditRequest, IdentityResolver, SubmitRequest};
    use lifeblood_db::{InspectionService, MemoryInspectionRepository};
    use serde_json::Value;
    use sqlx::Postgres;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tower::ServiceExt;

    const JANE: &str = "jane@lifeblood.example";

    fn test_app() -> Router {
        let repo = Arc::new(MemoryInspectionRepository::new());
        let service = InspectionService::<Postgres>::new(repo);
        let identity = IdentityResolver::new().with_env(Arc::new(HashMap::<String, String>::new()));
        app(AppState::new(service, identity))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-email", JANE);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn submit_body() -> Value {
        serde_json::to_value(SubmitRequest {
            form: sample_form(),
            submitted_as: None,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_missing_identity_is_unauthorized() {
        let app = test_app();
        let request = Request::builder().uri("/me").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_reports_source() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/me", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], JANE);
        assert_eq!(body["source"]["kind"], "header");
        assert_eq!(body["source"]["name"], "x-forwarded-email");
    }

    #[tokio::test]
    async fn test_submit_then_duplicate_conflict() {
        let app = test_app();
        let (status, created) = send(&app, "POST", "/inspections", Some(submit_body())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["user_email"], JANE);
        let id = created["id"].as_i64().unwrap();

        let (status, conflict) = send(&app, "POST", "/inspections", Some(submit_body())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(conflict["duplicate"]["id"].as_i64(), Some(id));
        assert_eq!(conflict["duplicate"]["user_email"], JANE);
    }

    #[tokio::test]
    async fn test_invalid_contact_number_rejected() {
        let app = test_app();
        let mut body = submit_body();
        body["donor_contact_number"] = Value::from("12345");
        let (status, error) = send(&app, "POST", "/inspections", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error["error"].as_str().unwrap().contains("donor_contact_number"));
    }

    #[tokio::test]
    async fn test_malformed_body_rejected() {
        let app = test_app();
        let mut body = submit_body();
        body["donation_chairs_condition"] = Value::from("");
        let (status, _) = send(&app, "POST", "/inspections", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_edit_history_and_summary() {
        let app = test_app();
        let (_, created) = send(&app, "POST", "/inspections", Some(submit_body())).await;
        let id = created["id"].as_i64().unwrap();

        let mut form = sample_form();
        form.donor_health_screening_completed = false;
        let edit = serde_json::to_value(EditRequest {
            form,
            edit_reason: "screening not finished".to_string(),
            submitted_as: None,
        })
        .unwrap();
        let (status, report) = send(&app, "PUT", &format!("/inspections/{id}"), Some(edit)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["changed_count"], 1);
        assert_eq!(report["no_changes"], false);
        let change = report["changes"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["changed"] == true)
            .unwrap();
        assert_eq!(change["field_name"], "Health Screening Completed");
        assert_eq!(change["before"], "Yes");
        assert_eq!(change["after"], "No");
        assert_eq!(report["stamp"]["last_modified_by"], JANE);

        let (status, history) =
            send(&app, "GET", &format!("/inspections/{id}/history"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history["total"], 2);

        let (status, summary) = send(&app, "GET", "/inspections/summary", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["total_records"], 1);
        assert_eq!(summary["modified_records"], 1);
        assert_eq!(summary["unique_users"], 1);
    }

    #[tokio::test]
    async fn test_get_and_list() {
        let app = test_app();
        let (_, created) = send(&app, "POST", "/inspections", Some(submit_body())).await;
        let id = created["id"].as_i64().unwrap();

        let (status, record) = send(&app, "GET", &format!("/inspections/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(record["donor_name"], "Sam Donor");

        let (status, _) = send(&app, "GET", "/inspections/999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, "GET", "/inspections/not-a-number", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, page) = send(&app, "GET", "/inspections?limit=1&offset=0", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["total"], 1);
        assert_eq!(page["items"][0]["id"].as_i64(), Some(id));

        let (status, page) =
            send(&app, "GET", "/inspections?offset=18446744073709551615", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["total"], 1);
        assert_eq!(page["items"].as_array().map(Vec::len), Some(0));
        assert_eq!(page["offset"].as_u64(), Some(i64::MAX as u64));
    }
}
