//! Document and write types exchanged with the backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON object body of a document.
pub type Fields = Map<String, Value>;

/// A document read from the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    /// Full slash-separated path, e.g. `tenants/acme/employees/e1`.
    pub path: String,
    pub data: Fields,
}

impl Document {
    pub fn new(path: impl Into<String>, data: Fields) -> Self {
        let path = path.into();
        let id = crate::paths::document_id(&path).to_string();
        Self { id, path, data }
    }

    /// String field lookup.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }
}

/// A single write inside a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum WriteOp {
    /// Create or fully overwrite the document at `path`.
    Set { path: String, data: Fields },
    Delete { path: String },
}

impl WriteOp {
    pub fn path(&self) -> &str {
        match self {
            Self::Set { path, .. } | Self::Delete { path } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_id_from_path() {
        let data = json!({"name": "Ada"}).as_object().cloned().unwrap();
        let doc = Document::new("tenants/acme/employees/e1", data);
        assert_eq!(doc.id, "e1");
        assert_eq!(doc.str_field("name"), Some("Ada"));
        assert_eq!(doc.str_field("missing"), None);
    }

    #[test]
    fn test_write_op_path() {
        let set = WriteOp::Set { path: "a/b".into(), data: Fields::new() };
        let del = WriteOp::Delete { path: "c/d".into() };
        assert_eq!(set.path(), "a/b");
        assert_eq!(del.path(), "c/d");
    }
}
