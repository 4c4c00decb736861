//! The persisted codex document

use crate::domain::carpentry::{LumberCalculation, ProjectEstimate};
use crate::domain::finance::FinanceBook;
use crate::domain::philosophy::{JournalEntry, Reflection};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DOCUMENT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub created: NaiveDateTime,
    pub last_modified: NaiveDateTime,
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    DOCUMENT_VERSION.to_string()
}

impl Meta {
    fn fresh(now: NaiveDateTime) -> Self {
        Meta {
            created: now,
            last_modified: now,
            version: default_version(),
        }
    }
}

/// Everything the user has recorded, stored as one JSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodexDocument {
    pub meta: Meta,
    #[serde(default)]
    pub journal: Vec<JournalEntry>,
    #[serde(default)]
    pub finance: FinanceBook,
    #[serde(default)]
    pub projects: Vec<ProjectEstimate>,
    #[serde(default)]
    pub notes: Vec<Value>,
    #[serde(default)]
    pub reflections: Vec<Reflection>,
    #[serde(default)]
    pub lumber_calculations: Vec<LumberCalculation>,
    /// Top-level keys this version does not know about
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CodexDocument {
    pub fn new(now: NaiveDateTime) -> Self {
        CodexDocument {
            meta: Meta::fresh(now),
            journal: Vec::new(),
            finance: FinanceBook::default(),
            projects: Vec::new(),
            notes: Vec::new(),
            reflections: Vec::new(),
            lumber_calculations: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn touch(&mut self, now: NaiveDateTime) {
        self.meta.last_modified = now;
    }
}

impl Default for CodexDocument {
    fn default() -> Self {
        CodexDocument::new(now())
    }
}

/// Local wall-clock time, the timestamp format every record uses
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Short random record id (8 hex characters)
pub fn short_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..8].to_string()
}

pub fn transaction_id() -> String {
    format!("txn_{}", short_id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_document_shape() {
        let doc = CodexDocument::default();
        let json = serde_json::to_value(&doc).unwrap();
        for key in [
            "meta",
            "journal",
            "finance",
            "projects",
            "notes",
            "reflections",
            "lumber_calculations",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert_eq!(json["finance"]["transactions"], json!([]));
        assert_eq!(json["finance"]["budgets"], json!({}));
        assert_eq!(json["meta"]["version"], DOCUMENT_VERSION);
    }

    #[test]
    fn test_unknown_keys_survive_roundtrip() {
        let raw = json!({
            "meta": {"created": "2025-01-01T00:00:00", "last_modified": "2025-01-01T00:00:00"},
            "codex_conversations": [{"role": "user", "content": "hi"}]
        });
        let doc: CodexDocument = serde_json::from_value(raw).unwrap();
        assert!(doc.journal.is_empty());
        assert!(doc.extra.contains_key("codex_conversations"));

        let back = serde_json::to_value(&doc).unwrap();
        assert_eq!(back["codex_conversations"][0]["content"], "hi");
    }

    #[test]
    fn test_ids() {
        let id = short_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(transaction_id().starts_with("txn_"));
        assert_ne!(short_id(), short_id());
    }
}
