// Task models
// Path: /tasks/{id}/ - owned by the API, refreshed by refetching after every write

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::de;
use super::id::ResourceId;
use crate::error::{ClientError, Result};

/// Task priority as the API spells it: "Low", "Medium", "High"
///
/// Anything else is kept verbatim in `Other` so a surprising payload never
/// fails the whole list; `Other` matches no priority filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Low,
    Medium,
    High,
    Other(String),
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

impl Priority {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Low" => Self::Low,
            "Medium" => Self::Medium,
            "High" => Self::High,
            _ => Self::Other(s),
        }
    }
}

impl From<Priority> for String {
    fn from(p: Priority) -> Self {
        match p {
            Priority::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive parse of the three known priorities (command-line input)
impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!(
                "unknown priority '{}' (expected low, medium or high)",
                other
            )),
        }
    }
}

/// A task as returned by GET /tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: ResourceId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    /// Group this task belongs to, if any
    #[serde(default, deserialize_with = "de::optional_id")]
    pub group: Option<ResourceId>,
    /// Calendar day the task is due; time of day is dropped on decode
    #[serde(default, deserialize_with = "de::optional_date")]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(deserialize_with = "de::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "de::optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Case-insensitive substring match on title or description.
    /// `needle` must already be lowercase.
    pub fn matches_text(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

/// Request body for POST /tasks/
#[derive(Debug, Clone, Serialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<ResourceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl CreateTaskRequest {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: Priority::default(),
            group: None,
            due_date: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(ClientError::Invalid("Title is required".to_string()));
        }
        Ok(())
    }
}

/// Request body for PUT /tasks/{id}/ - only the fields that are set are sent.
///
/// `group` and `due_date` are clearable: `Some(None)` goes out as `null`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateTaskRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<Option<ResourceId>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_complete: Option<bool>,
}

impl UpdateTaskRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.group.is_none()
            && self.due_date.is_none()
            && self.is_complete.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(ClientError::Invalid("nothing to update".to_string()));
        }
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ClientError::Invalid("Title is required".to_string()));
        }
        Ok(())
    }
}
