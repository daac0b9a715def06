//! API route handlers for the gateway.

use axum::{Json, extract::{Path, State}, http::StatusCode};
use serde_json::{Value, json};
use staffhub_core::error::StaffHubError;
use staffhub_core::paths::{ResourceType, validate_document_id};
use staffhub_core::tenant::TenantId;
use std::sync::Arc;

use super::server::AppState;

type ApiResult = Result<Json<Value>, (StatusCode, Json<Value>)>;

fn api_error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "ok": false, "error": message.into() })))
}

fn parse_target(tenant: &str, resource: &str) -> Result<(TenantId, ResourceType), (StatusCode, Json<Value>)> {
    let tenant = TenantId::parse(tenant).map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
    let resource = resource
        .parse::<ResourceType>()
        .map_err(|e| api_error(StatusCode::NOT_FOUND, e.to_string()))?;
    Ok((tenant, resource))
}

fn internal(e: StaffHubError) -> (StatusCode, Json<Value>) {
    tracing::error!("Request failed: {e}");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// Health check endpoint.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "staffhub-gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

/// Current connectivity state and banner.
pub async fn connectivity_status(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "ok": true, "connectivity": state.service.monitor().snapshot() }))
}

/// The client regained network access.
pub async fn report_online(State(state): State<Arc<AppState>>) -> Json<Value> {
    state.service.monitor().go_online();
    Json(json!({ "ok": true, "connectivity": state.service.monitor().snapshot() }))
}

/// The client lost network access.
pub async fn report_offline(State(state): State<Arc<AppState>>) -> Json<Value> {
    state.service.monitor().go_offline();
    Json(json!({ "ok": true, "connectivity": state.service.monitor().snapshot() }))
}

/// List a tenant collection.
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
    Path((tenant, resource)): Path<(String, String)>,
) -> ApiResult {
    let (tenant, resource) = parse_target(&tenant, &resource)?;
    let docs = state.service.list(&tenant, resource).await.map_err(internal)?;
    Ok(Json(json!({
        "ok": true,
        "source": docs.source,
        "count": docs.value.len(),
        "documents": docs.value,
        "banner": state.service.monitor().banner(),
    })))
}

/// Fetch one tenant document.
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path((tenant, resource, id)): Path<(String, String, String)>,
) -> ApiResult {
    let (tenant, resource) = parse_target(&tenant, &resource)?;
    validate_document_id(&id).map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
    let doc = state.service.get(&tenant, resource, &id).await.map_err(internal)?;
    match doc.value {
        Some(document) => Ok(Json(json!({
            "ok": true,
            "source": doc.source,
            "document": document,
            "banner": state.service.monitor().banner(),
        }))),
        None => Err(api_error(StatusCode::NOT_FOUND, format!("{resource}/{id} not found"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::build_router;
    use axum::body::Body;
    use axum::http::Request;
    use staffhub_connectivity::ConnectivityMonitor;
    use staffhub_core::config::ConnectivityConfig;
    use staffhub_core::traits::DocumentStore;
    use staffhub_platform::{SqliteStore, TenantService};
    use tower::ServiceExt;

    async fn app() -> axum::Router {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        store
            .set_document("tenants/acme/employees/e1", json!({"name": "Ada"}).as_object().cloned().unwrap())
            .await
            .unwrap();
        store
            .set_document("tenants/globex/employees/e1", json!({"name": "Globex only"}).as_object().cloned().unwrap())
            .await
            .unwrap();
        let monitor = ConnectivityMonitor::new(&ConnectivityConfig::default(), None);
        let service = TenantService::new(store, None, monitor);
        build_router(AppState::new(Arc::new(service)))
    }

    async fn call(app: &axum::Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let req = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let app = app().await;
        let (status, body) = call(&app, "GET", "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_and_get() {
        let app = app().await;
        let (status, body) = call(&app, "GET", "/api/v1/tenants/acme/employees").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["source"], "primary");
        assert!(body["banner"].is_null());

        let (status, body) = call(&app, "GET", "/api/v1/tenants/acme/employees/e1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["document"]["data"]["name"], "Ada");

        let (status, _) = call(&app, "GET", "/api/v1/tenants/acme/employees/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rejects_bad_tenant_and_resource() {
        let app = app().await;
        let (status, body) = call(&app, "GET", "/api/v1/tenants/a.b/employees").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);
        let (status, _) = call(&app, "GET", "/api/v1/tenants/acme/widgets").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_id_cannot_leave_tenant() {
        let app = app().await;
        for uri in [
            "/api/v1/tenants/acme/employees/..%2F..%2Fglobex%2Femployees%2Fe1",
            "/api/v1/tenants/acme/employees/%2E%2E",
            "/api/v1/tenants/acme/employees/a%2Fb",
        ] {
            let (status, body) = call(&app, "GET", uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["ok"], false);
            assert!(body.get("document").is_none());
        }
    }

    #[tokio::test]
    async fn test_offline_event_shows_banner() {
        let app = app().await;
        let (_, body) = call(&app, "POST", "/api/v1/connectivity/offline").await;
        assert_eq!(body["connectivity"]["state"], "disconnected");
        assert_eq!(body["connectivity"]["banner"]["level"], "warning");

        // No cache configured: reads degrade to empty.
        let (status, body) = call(&app, "GET", "/api/v1/tenants/acme/employees").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["source"], "empty");
        assert_eq!(body["count"], 0);
        assert!(body["banner"]["message"].as_str().unwrap().contains("offline"));

        let (_, body) = call(&app, "POST", "/api/v1/connectivity/online").await;
        assert_eq!(body["connectivity"]["state"], "reconnecting");
        let (_, body) = call(&app, "GET", "/api/v1/connectivity").await;
        assert_eq!(body["connectivity"]["online"], true);
    }
}
