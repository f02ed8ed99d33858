//! API router.
//!
//! Returns a composable `Router` with every route nested under `/api/`.
//! Layers (outermost → innermost): CORS → access log → handler.

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the clinic API router around a prepared context.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn api_router(ctx: ApiContext) -> Router {
    let admin = Router::new()
        .route(
            "/patients",
            get(endpoints::patients::list).post(endpoints::patients::create),
        )
        .route(
            "/patients/:id",
            get(endpoints::patients::detail)
                .patch(endpoints::patients::update)
                .delete(endpoints::patients::remove),
        )
        .route(
            "/patients/:id/appointments",
            get(endpoints::appointments::list).post(endpoints::appointments::create),
        )
        .route(
            "/appointments/:id",
            axum::routing::patch(endpoints::appointments::update)
                .delete(endpoints::appointments::remove),
        )
        .route(
            "/patients/:id/prescriptions",
            get(endpoints::prescriptions::list).post(endpoints::prescriptions::create),
        )
        .route(
            "/prescriptions/:id",
            axum::routing::patch(endpoints::prescriptions::update)
                .delete(endpoints::prescriptions::remove),
        )
        .route("/reference", get(endpoints::reference::lists));

    let portal = Router::new()
        .route("/portal/:patient_id", get(endpoints::portal::dashboard))
        .route(
            "/portal/:patient_id/appointments",
            get(endpoints::portal::appointments),
        )
        .route(
            "/portal/:patient_id/medications",
            get(endpoints::portal::medications),
        );

    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .merge(admin)
        .merge(portal)
        .with_state(ctx);

    Router::new()
        .nest("/api", api)
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{NaiveDate, NaiveDateTime};
    use tower::ServiceExt;

    use crate::reference::ReferenceData;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn test_router() -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ApiContext::new(dir.path().join("clinic.db"), ReferenceData::bundled().unwrap())
            .with_clock(now);
        (api_router(ctx), dir)
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn create_patient(app: &Router, email: &str) -> String {
        let (status, json) = send(
            app,
            "POST",
            "/api/patients",
            Some(serde_json::json!({ "name": "Mark Johnson", "email": email })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        json["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_check_reports_ok() {
        let (app, _dir) = test_router();
        let (status, json) = send(&app, "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["patients"], 0);
    }

    #[tokio::test]
    async fn reference_lists_are_served() {
        let (app, _dir) = test_router();
        let (status, json) = send(&app, "GET", "/api/reference", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["medications"].as_array().unwrap().len() > 1);
        assert!(json["dosages"].as_array().unwrap().len() > 1);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let (app, _dir) = test_router();
        create_patient(&app, "mark@example.com").await;
        let (status, json) = send(
            &app,
            "POST",
            "/api/patients",
            Some(serde_json::json!({ "name": "Other", "email": "mark@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"]["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let (app, _dir) = test_router();
        let (status, _) = send(
            &app,
            "POST",
            "/api/patients",
            Some(serde_json::json!({ "name": "  ", "email": "x@example.com" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn portal_dashboard_projects_series() {
        let (app, _dir) = test_router();
        let id = create_patient(&app, "mark@example.com").await;

        let (status, appt) = send(
            &app,
            "POST",
            &format!("/api/patients/{id}/appointments"),
            Some(serde_json::json!({
                "provider": "Dr Kim West",
                "datetime": "2024-01-02T09:00",
                "repeat": "weekly"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(appt["repeat"], "weekly");

        let (status, rx) = send(
            &app,
            "POST",
            &format!("/api/patients/{id}/prescriptions"),
            Some(serde_json::json!({
                "medication": "Lexapro",
                "dosage": "5mg",
                "quantity": -3,
                "refill_on": "2024-01-05",
                "refill_schedule": "Every 30 days"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(rx["quantity"], 0);
        assert_eq!(rx["refill_schedule"], "every_30_days");

        let (status, dash) = send(&app, "GET", &format!("/api/portal/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(dash["upcoming_appointments"].as_array().unwrap().len(), 1);
        assert_eq!(dash["upcoming_refills"].as_array().unwrap().len(), 1);

        let (_, meds) = send(&app, "GET", &format!("/api/portal/{id}/medications"), None).await;
        let refills = meds["refills"].as_array().unwrap();
        // Jan 5, Feb 4, Mar 5 within ninety days of Jan 1
        assert_eq!(refills.len(), 3);
        assert_eq!(refills[0]["schedule_label"], "Every 30 days");
        assert_eq!(refills[0]["medication"], "Lexapro");

        let (_, roster) = send(&app, "GET", "/api/patients", None).await;
        assert_eq!(
            roster[0]["next_appointment"]["datetime"],
            "2024-01-02T09:00:00"
        );
    }

    #[tokio::test]
    async fn unknown_repeat_rule_is_rejected() {
        let (app, _dir) = test_router();
        let id = create_patient(&app, "mark@example.com").await;
        let (status, json) = send(
            &app,
            "POST",
            &format!("/api/patients/{id}/appointments"),
            Some(serde_json::json!({
                "provider": "Dr Kim West",
                "datetime": "2024-01-02T09:00",
                "repeat": "daily"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn camel_case_series_fields_are_accepted() {
        let (app, _dir) = test_router();
        let id = create_patient(&app, "mark@example.com").await;

        let (status, appt) = send(
            &app,
            "POST",
            &format!("/api/patients/{id}/appointments"),
            Some(serde_json::json!({
                "provider": "Dr Kim West",
                "datetime": "2024-01-02T09:00",
                "repeat": "weekly",
                "endDate": "2024-01-10"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(appt["end_date"], "2024-01-10");

        let (_, list) = send(&app, "GET", &format!("/api/portal/{id}/appointments"), None).await;
        let visits: Vec<_> = list["appointments"]
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o["datetime"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(visits, vec!["2024-01-02T09:00:00", "2024-01-09T09:00:00"]);

        let (status, rx) = send(
            &app,
            "POST",
            &format!("/api/patients/{id}/prescriptions"),
            Some(serde_json::json!({
                "medication": "Lexapro",
                "dosage": "5mg",
                "quantity": "30",
                "refillOn": "2024-01-05",
                "refillSchedule": "monthly",
                "endDate": "2024-02-05"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(rx["quantity"], 30);
        assert_eq!(rx["refill_on"], "2024-01-05");
        assert_eq!(rx["end_date"], "2024-02-05");

        let rx_id = rx["id"].as_str().unwrap();
        let (status, patched) = send(
            &app,
            "PATCH",
            &format!("/api/prescriptions/{rx_id}"),
            Some(serde_json::json!({ "quantity": "many", "refillSchedule": "quarterly" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(patched["quantity"], 0);
        assert_eq!(patched["refill_schedule"], "quarterly");
    }

    #[tokio::test]
    async fn end_date_stops_visit_later_that_day() {
        let (app, _dir) = test_router();
        let id = create_patient(&app, "mark@example.com").await;
        send(
            &app,
            "POST",
            &format!("/api/patients/{id}/appointments"),
            Some(serde_json::json!({
                "provider": "Dr Kim West",
                "datetime": "2024-01-02T09:00",
                "repeat": "weekly",
                "end_date": "2024-01-09"
            })),
        )
        .await;

        let (_, list) = send(&app, "GET", &format!("/api/portal/{id}/appointments"), None).await;
        let visits = list["appointments"].as_array().unwrap();
        assert_eq!(visits.len(), 1);
        assert_eq!(visits[0]["datetime"], "2024-01-02T09:00:00");
    }

    #[tokio::test]
    async fn appointment_patch_and_delete() {
        let (app, _dir) = test_router();
        let id = create_patient(&app, "mark@example.com").await;
        let (_, appt) = send(
            &app,
            "POST",
            &format!("/api/patients/{id}/appointments"),
            Some(serde_json::json!({ "provider": "Dr Kim West", "datetime": "2024-01-02T09:00" })),
        )
        .await;
        assert_eq!(appt["repeat"], "none");
        let appt_id = appt["id"].as_str().unwrap();

        let (status, patched) = send(
            &app,
            "PATCH",
            &format!("/api/appointments/{appt_id}"),
            Some(serde_json::json!({ "repeat": "monthly", "end_date": "2024-03-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(patched["repeat"], "monthly");
        assert_eq!(patched["end_date"], "2024-03-01");
        assert_eq!(patched["provider"], "Dr Kim West");

        let (status, _) = send(&app, "DELETE", &format!("/api/appointments/{appt_id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "DELETE", &format!("/api/appointments/{appt_id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn deleting_patient_removes_series() {
        let (app, _dir) = test_router();
        let id = create_patient(&app, "mark@example.com").await;
        send(
            &app,
            "POST",
            &format!("/api/patients/{id}/prescriptions"),
            Some(serde_json::json!({ "medication": "Lexapro", "dosage": "5mg", "refill_on": "2024-01-05" })),
        )
        .await;

        let (status, _) = send(&app, "DELETE", &format!("/api/patients/{id}"), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, "GET", &format!("/api/patients/{id}/prescriptions"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_ids_and_unknown_patients() {
        let (app, _dir) = test_router();
        let (status, _) = send(&app, "GET", "/api/portal/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let missing = uuid::Uuid::new_v4();
        let (status, json) = send(&app, "GET", &format!("/api/portal/{missing}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["message"], "patient not found");
    }
}
