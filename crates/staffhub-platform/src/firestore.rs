//! Firestore REST v1 document store.
//!
//! Documents travel as typed values (`stringValue`, `integerValue`, ...); this
//! module converts them to and from plain JSON objects. HTTP failures are
//! mapped onto the workspace error kinds so the connectivity monitor can tell
//! transient outages from permission problems:
//!
//! - connect/timeout errors, 5xx and 429 → [`StaffHubError::Network`]
//! - 401 / 403 → [`StaffHubError::PermissionDenied`]
//! - anything else → [`StaffHubError::Backend`]

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde_json::{Map, Value, json};
use staffhub_core::config::BackendConfig;
use staffhub_core::error::{Result, StaffHubError};
use staffhub_core::traits::DocumentStore;
use staffhub_core::traits::store::{is_collection_path, is_document_path};
use staffhub_core::types::{Document, Fields, WriteOp};

const PAGE_SIZE: u32 = 300;

pub struct FirestoreStore {
    documents_root: String,
    documents_url: Url,
    access_token: String,
    client: reqwest::Client,
}

impl FirestoreStore {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        if config.project_id.is_empty() {
            return Err(StaffHubError::config("backend.project_id is required for firestore"));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| StaffHubError::backend(format!("HTTP client: {e}")))?;
        let documents_root = format!(
            "projects/{}/databases/{}/documents",
            config.project_id, config.database
        );
        let documents_url = Url::parse(&format!("{}/{}", config.api_base.trim_end_matches('/'), documents_root))
            .map_err(|e| StaffHubError::config(format!("backend.api_base: {e}")))?;
        if documents_url.cannot_be_a_base() {
            return Err(StaffHubError::config(format!("backend.api_base is not a base URL: {}", config.api_base)));
        }
        Ok(Self {
            documents_root,
            documents_url,
            access_token: config.resolved_access_token(),
            client,
        })
    }

    /// REST URL of a document or collection. Each path segment is
    /// percent-encoded on its own, so `#`, `?` and `%` in IDs stay in the ID.
    fn url(&self, path: &str) -> Result<Url> {
        if !is_document_path(path) && !is_collection_path(path) {
            return Err(StaffHubError::InvalidPath(path.to_string()));
        }
        let mut url = self.documents_url.clone();
        url.path_segments_mut()
            .map_err(|_| StaffHubError::config("backend.api_base is not a base URL"))?
            .pop_if_empty()
            .extend(path.split('/'));
        Ok(url)
    }

    /// Fully qualified resource name used inside commit requests.
    fn resource_name(&self, path: &str) -> String {
        format!("{}/{}", self.documents_root, path)
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.access_token.is_empty() {
            req
        } else {
            req.bearer_auth(&self.access_token)
        }
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let resp = self.authorized(req).send().await.map_err(map_transport_error)?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(error_for_status(status, &body))
    }

    fn document_from_json(&self, raw: &Value) -> Result<Document> {
        let name = raw["name"]
            .as_str()
            .ok_or_else(|| StaffHubError::backend("Document without name"))?;
        let path = name
            .split_once("/documents/")
            .map(|(_, p)| p)
            .ok_or_else(|| StaffHubError::backend(format!("Unexpected document name: {name}")))?;
        let fields = match raw.get("fields") {
            Some(Value::Object(f)) => decode_fields(f),
            _ => Fields::new(),
        };
        Ok(Document::new(path, fields))
    }
}

fn map_transport_error(e: reqwest::Error) -> StaffHubError {
    if e.is_timeout() || e.is_connect() || e.is_request() {
        StaffHubError::network(format!("Firestore unreachable: {e}"))
    } else {
        StaffHubError::backend(format!("Firestore request failed: {e}"))
    }
}

/// Map a non-success HTTP status onto an error kind.
pub fn error_for_status(status: StatusCode, body: &str) -> StaffHubError {
    let msg = format!("Firestore {status}: {body}");
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StaffHubError::PermissionDenied(msg),
        StatusCode::NOT_FOUND => StaffHubError::NotFound(msg),
        StatusCode::TOO_MANY_REQUESTS | StatusCode::REQUEST_TIMEOUT => StaffHubError::Network(msg),
        s if s.is_server_error() => StaffHubError::Network(msg),
        _ => StaffHubError::Backend(msg),
    }
}

// ── Value conversion ────────────────────────────────────

pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

pub fn encode_fields(fields: &Fields) -> Value {
    Value::Object(fields.iter().map(|(k, v)| (k.clone(), encode_value(v))).collect())
}

pub fn decode_value(value: &Value) -> Value {
    let Some(obj) = value.as_object() else {
        return Value::Null;
    };
    let Some((kind, inner)) = obj.iter().next() else {
        return Value::Null;
    };
    match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => Value::Bool(inner.as_bool().unwrap_or_default()),
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .or_else(|| inner.as_i64())
            .map(Value::from)
            .unwrap_or(Value::Null),
        "doubleValue" => inner.as_f64().map(Value::from).unwrap_or(Value::Null),
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "geoPointValue" => inner.clone(),
        "arrayValue" => Value::Array(
            inner["values"]
                .as_array()
                .map(|vs| vs.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => Value::Object(
            inner["fields"].as_object().map(decode_fields).unwrap_or_default(),
        ),
        _ => Value::Null,
    }
}

pub fn decode_fields(fields: &Map<String, Value>) -> Fields {
    fields.iter().map(|(k, v)| (k.clone(), decode_value(v))).collect()
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    fn name(&self) -> &str {
        "firestore"
    }

    async fn get_document(&self, path: &str) -> Result<Option<Document>> {
        if !is_document_path(path) {
            return Err(StaffHubError::InvalidPath(path.to_string()));
        }
        match self.send(self.client.get(self.url(path)?)).await {
            Ok(resp) => {
                let raw: Value = resp.json().await.map_err(map_transport_error)?;
                self.document_from_json(&raw).map(Some)
            }
            Err(StaffHubError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn list_documents(&self, collection: &str) -> Result<Vec<Document>> {
        if !is_collection_path(collection) {
            return Err(StaffHubError::InvalidPath(collection.to_string()));
        }
        let mut docs = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut req = self.client.get(self.url(collection)?).query(&[("pageSize", PAGE_SIZE.to_string())]);
            if let Some(token) = &page_token {
                req = req.query(&[("pageToken", token)]);
            }
            let page: Value = match self.send(req).await {
                Ok(resp) => resp.json().await.map_err(map_transport_error)?,
                // Empty or missing collections are not an error.
                Err(StaffHubError::NotFound(_)) => break,
                Err(e) => return Err(e),
            };
            if let Some(items) = page["documents"].as_array() {
                for raw in items {
                    docs.push(self.document_from_json(raw)?);
                }
            }
            match page["nextPageToken"].as_str() {
                Some(t) if !t.is_empty() => page_token = Some(t.to_string()),
                _ => break,
            }
        }
        docs.sort_by(|a, b| a.id.cmp(&b.id));
        tracing::debug!("Listed {} documents from {collection}", docs.len());
        Ok(docs)
    }

    async fn set_document(&self, path: &str, data: Fields) -> Result<()> {
        if !is_document_path(path) {
            return Err(StaffHubError::InvalidPath(path.to_string()));
        }
        let body = json!({ "fields": encode_fields(&data) });
        self.send(self.client.patch(self.url(path)?).json(&body)).await?;
        Ok(())
    }

    async fn delete_document(&self, path: &str) -> Result<()> {
        if !is_document_path(path) {
            return Err(StaffHubError::InvalidPath(path.to_string()));
        }
        self.send(self.client.delete(self.url(path)?)).await?;
        Ok(())
    }

    async fn commit_batch(&self, writes: Vec<WriteOp>) -> Result<()> {
        if writes.is_empty() {
            return Ok(());
        }
        let mut encoded = Vec::with_capacity(writes.len());
        for write in &writes {
            if !is_document_path(write.path()) {
                return Err(StaffHubError::InvalidPath(write.path().to_string()));
            }
            encoded.push(match write {
                WriteOp::Set { path, data } => json!({
                    "update": { "name": self.resource_name(path), "fields": encode_fields(data) }
                }),
                WriteOp::Delete { path } => json!({ "delete": self.resource_name(path) }),
            });
        }
        let url = format!("{}:commit", self.documents_url.as_str().trim_end_matches('/'));
        self.send(self.client.post(url).json(&json!({ "writes": encoded }))).await?;
        tracing::debug!("Committed batch of {} writes", writes.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> FirestoreStore {
        let cfg = BackendConfig {
            project_id: "hr-prod".into(),
            access_token: "tok".into(),
            ..BackendConfig::default()
        };
        FirestoreStore::new(&cfg).unwrap()
    }

    #[test]
    fn test_requires_project() {
        assert!(FirestoreStore::new(&BackendConfig::default()).is_err());
    }

    #[test]
    fn test_urls() {
        let s = store();
        assert_eq!(
            s.url("tenants/acme/employees/e1").unwrap().as_str(),
            "https://firestore.googleapis.com/v1/projects/hr-prod/databases/(default)/documents/tenants/acme/employees/e1"
        );
        assert!(s.url("tenants/acme/employees").unwrap().path().ends_with("/documents/tenants/acme/employees"));
        assert_eq!(
            s.resource_name("employees/e1"),
            "projects/hr-prod/databases/(default)/documents/employees/e1"
        );
    }

    #[test]
    fn test_url_keeps_special_ids_in_their_segment() {
        let s = store();
        let url = s.url("tenants/acme/employees/a#b").unwrap();
        assert!(url.path().ends_with("/documents/tenants/acme/employees/a%23b"), "{url}");
        assert_eq!(url.fragment(), None);

        let url = s.url("tenants/acme/employees/a?x=1").unwrap();
        assert!(url.path().ends_with("/employees/a%3Fx=1"), "{url}");
        assert_eq!(url.query(), None);

        let url = s.url("employees/100%").unwrap();
        assert!(url.path().ends_with("/employees/100%25"), "{url}");
    }

    #[test]
    fn test_url_rejects_relative_segments() {
        let s = store();
        let escape = "tenants/acme/employees/../../globex/employees/e1";
        assert!(matches!(s.url(escape), Err(StaffHubError::InvalidPath(_))));
        assert!(s.url("tenants/acme/employees/.").is_err());
        assert!(s.url("").is_err());
    }

    #[test]
    fn test_encode_typed_values() {
        let fields = json!({"name": "Ada", "age": 36, "rate": 1.5, "active": true, "tags": ["a"], "addr": {"city": "Hue"}, "note": null});
        let encoded = encode_fields(fields.as_object().unwrap());
        assert_eq!(encoded["name"], json!({"stringValue": "Ada"}));
        assert_eq!(encoded["age"], json!({"integerValue": "36"}));
        assert_eq!(encoded["rate"], json!({"doubleValue": 1.5}));
        assert_eq!(encoded["active"], json!({"booleanValue": true}));
        assert_eq!(encoded["tags"], json!({"arrayValue": {"values": [{"stringValue": "a"}]}}));
        assert_eq!(encoded["addr"]["mapValue"]["fields"]["city"], json!({"stringValue": "Hue"}));
        assert_eq!(encoded["note"], json!({"nullValue": null}));

        let decoded = decode_fields(encoded.as_object().unwrap());
        assert_eq!(Value::Object(decoded), fields);
    }

    #[test]
    fn test_decode_server_only_types() {
        assert_eq!(decode_value(&json!({"timestampValue": "2024-01-02T03:04:05Z"})), json!("2024-01-02T03:04:05Z"));
        assert_eq!(decode_value(&json!({"arrayValue": {}})), json!([]));
        assert_eq!(decode_value(&json!({"mapValue": {}})), json!({}));
        assert_eq!(decode_value(&json!({"somethingNew": 1})), Value::Null);
    }

    #[test]
    fn test_document_from_json() {
        let s = store();
        let raw = json!({
            "name": "projects/hr-prod/databases/(default)/documents/employees/e1",
            "fields": {"name": {"stringValue": "Ada"}},
            "createTime": "2024-01-01T00:00:00Z"
        });
        let doc = s.document_from_json(&raw).unwrap();
        assert_eq!(doc.path, "employees/e1");
        assert_eq!(doc.id, "e1");
        assert_eq!(doc.str_field("name"), Some("Ada"));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(error_for_status(StatusCode::FORBIDDEN, ""), StaffHubError::PermissionDenied(_)));
        assert!(matches!(error_for_status(StatusCode::UNAUTHORIZED, ""), StaffHubError::PermissionDenied(_)));
        assert!(matches!(error_for_status(StatusCode::SERVICE_UNAVAILABLE, ""), StaffHubError::Network(_)));
        assert!(matches!(error_for_status(StatusCode::TOO_MANY_REQUESTS, ""), StaffHubError::Network(_)));
        assert!(matches!(error_for_status(StatusCode::NOT_FOUND, ""), StaffHubError::NotFound(_)));
        assert!(matches!(error_for_status(StatusCode::BAD_REQUEST, "bad"), StaffHubError::Backend(_)));
    }
}
