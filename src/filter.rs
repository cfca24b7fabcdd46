// Task filtering and sorting
// Pure transform from the fetched task list to what gets displayed

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

use crate::models::{Group, Priority, ResourceId, Task};

/// Order by creation time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Newest first
    #[default]
    Recent,
    /// Oldest first
    Oldest,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Pending,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

/// Relative due-date buckets, used when no explicit range is set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DueDateFilter {
    #[default]
    All,
    /// Due today or later
    Upcoming,
    /// Due before today and still open
    Missed,
}

/// Inclusive calendar-day window on `due_date`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// A range only exists when both bounds are given
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        match (start, end) {
            (Some(start), Some(end)) => Some(Self { start, end }),
            _ => None,
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

/// Everything the user can narrow the task list by
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub sort_by: SortBy,
    pub status: StatusFilter,
    pub priority: PriorityFilter,
    pub due_date: DueDateFilter,
    /// Empty means any group (and no group)
    pub selected_groups: HashSet<ResourceId>,
    pub search_query: String,
    pub date_range: Option<DateRange>,
}

impl FilterCriteria {
    /// True when nothing but the sort order applies
    pub fn is_passthrough(&self) -> bool {
        self.search_query.is_empty()
            && self.status == StatusFilter::All
            && self.priority == PriorityFilter::All
            && self.selected_groups.is_empty()
            && self.due_date == DueDateFilter::All
            && self.date_range.is_none()
    }
}

/// Derive the visible, ordered task list.
///
/// Steps run in a fixed order: search, sort, status, group, priority, then
/// either the explicit date range or the due-date bucket. `today` is the
/// local calendar day the buckets are measured against. The input is never
/// modified.
pub fn apply_filters(tasks: &[Task], criteria: &FilterCriteria, today: NaiveDate) -> Vec<Task> {
    let mut filtered: Vec<Task> = tasks.to_vec();

    if !criteria.search_query.is_empty() {
        let needle = criteria.search_query.to_lowercase();
        filtered.retain(|task| task.matches_text(&needle));
    }

    // sort_by is stable, ties keep their relative order
    match criteria.sort_by {
        SortBy::Recent => filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortBy::Oldest => filtered.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
    }

    match criteria.status {
        StatusFilter::All => {}
        StatusFilter::Completed => filtered.retain(|task| task.is_complete),
        StatusFilter::Pending => filtered.retain(|task| !task.is_complete),
    }

    if !criteria.selected_groups.is_empty() {
        filtered.retain(|task| {
            task.group
                .as_ref()
                .is_some_and(|group| criteria.selected_groups.contains(group))
        });
    }

    if let PriorityFilter::Only(wanted) = &criteria.priority {
        filtered.retain(|task| priority_matches(&task.priority, wanted));
    }

    if let Some(range) = &criteria.date_range {
        filtered.retain(|task| task.due_date.is_some_and(|due| range.contains(due)));
    } else {
        match criteria.due_date {
            DueDateFilter::All => {}
            DueDateFilter::Upcoming => {
                filtered.retain(|task| task.due_date.is_some_and(|due| due >= today))
            }
            DueDateFilter::Missed => filtered
                .retain(|task| !task.is_complete && task.due_date.is_some_and(|due| due < today)),
        }
    }

    tracing::debug!(
        "Filtered {} tasks down to {} (passthrough={})",
        tasks.len(),
        filtered.len(),
        criteria.is_passthrough()
    );
    filtered
}

/// Unknown priorities never match, not even an identical unknown value
fn priority_matches(actual: &Priority, wanted: &Priority) -> bool {
    !matches!(actual, Priority::Other(_)) && actual == wanted
}

/// Groups whose name or description contains `query`, ignoring case.
/// An empty query keeps every group; order is preserved.
pub fn filter_groups(groups: &[Group], query: &str) -> Vec<Group> {
    let needle = query.to_lowercase();
    groups
        .iter()
        .filter(|group| {
            group.name.to_lowercase().contains(&needle)
                || group
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "recent" => Ok(Self::Recent),
            "oldest" => Ok(Self::Oldest),
            other => Err(format!("unknown sort order '{}' (recent, oldest)", other)),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "completed" | "done" => Ok(Self::Completed),
            "pending" | "open" => Ok(Self::Pending),
            other => Err(format!("unknown status '{}' (all, completed, pending)", other)),
        }
    }
}

impl FromStr for PriorityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<Priority>().map(Self::Only)
    }
}

impl FromStr for DueDateFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "upcoming" => Ok(Self::Upcoming),
            "missed" | "overdue" => Ok(Self::Missed),
            other => Err(format!("unknown due filter '{}' (all, upcoming, missed)", other)),
        }
    }
}
