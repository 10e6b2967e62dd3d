//! Project domain model
//!
//! A project is a consent-collection surface owned by an organization. Only
//! projects that have been published at least once carry consents worth
//! exporting.

use super::ids::ProjectId;
use serde::Deserialize;
use serde_json::Value;

/// A project as returned by the projects listing with `with=metadata`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Project {
    /// Project identifier as sent by the server
    #[serde(default)]
    pub id: String,

    /// Publication metadata; `None` when absent or `null`
    #[serde(default)]
    pub metadata: Option<ProjectMetadata>,
}

/// Publication metadata of a project
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    /// Last time the project was made live, kept as sent: servers have been
    /// seen returning ISO strings as well as epoch milliseconds
    #[serde(default)]
    pub last_published_at: Option<Value>,
}

impl Project {
    /// Whether the project has ever been published
    ///
    /// Any `lastPublishedAt` counts except `null`, `""`, `false` and `0`.
    pub fn is_published(&self) -> bool {
        self.metadata
            .as_ref()
            .and_then(|m| m.last_published_at.as_ref())
            .is_some_and(is_set)
    }

    /// Identifier of a published project, `None` for unpublished projects
    /// or projects without a usable id
    pub fn published_id(&self) -> Option<ProjectId> {
        if !self.is_published() {
            return None;
        }
        ProjectId::new(self.id.clone()).ok()
    }
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}
