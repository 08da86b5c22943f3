//! Phase catalog categories and the workflow entity kinds they apply to.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Workflow entity kinds that carry a primary phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowKind {
    /// Payment authorization document (alvará).
    Document,
    /// Formal request / petition (requerimento).
    Request,
}

impl WorkflowKind {
    pub fn entity_name(self) -> &'static str {
        match self {
            WorkflowKind::Document => "Document",
            WorkflowKind::Request => "Request",
        }
    }
}

/// Which entity kinds a primary phase may be assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseCategory {
    Document,
    Request,
    Both,
}

impl PhaseCategory {
    pub const ALL: [PhaseCategory; 3] = [
        PhaseCategory::Document,
        PhaseCategory::Request,
        PhaseCategory::Both,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PhaseCategory::Document => "document",
            PhaseCategory::Request => "request",
            PhaseCategory::Both => "both",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == value)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid phase category '{value}'. Must be one of: document, request, both"
                ))
            })
    }

    /// Whether a phase of this category may be assigned to `kind`.
    pub fn applies_to(self, kind: WorkflowKind) -> bool {
        matches!(
            (self, kind),
            (PhaseCategory::Both, _)
                | (PhaseCategory::Document, WorkflowKind::Document)
                | (PhaseCategory::Request, WorkflowKind::Request)
        )
    }

    /// Categories whose phases are selectable for `kind`.
    pub fn selectable_for(kind: WorkflowKind) -> [&'static str; 2] {
        match kind {
            WorkflowKind::Document => [PhaseCategory::Document.as_str(), PhaseCategory::Both.as_str()],
            WorkflowKind::Request => [PhaseCategory::Request.as_str(), PhaseCategory::Both.as_str()],
        }
    }
}

/// Validate a phase or type display name: trimmed, 1..=100 characters.
pub fn validate_catalog_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Name must not be empty".into()));
    }
    if trimmed.chars().count() > 100 {
        return Err(CoreError::Validation(
            "Name must be at most 100 characters".into(),
        ));
    }
    Ok(trimmed.to_string())
}
