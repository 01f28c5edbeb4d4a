//! Application filtering and free-text search.
//!
//! All predicates are combined with AND. Filtering never reorders records.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Application, ApplicationStatus, Priority, WorkflowType};

/// Conjunction of optional predicates over applications
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    pub priority: Option<Priority>,
    pub workflow_type: Option<WorkflowType>,
    /// Case-insensitive substring over id, client, phone, address, description
    pub text: Option<String>,
    /// Inclusive lower bound on `created_at`
    pub created_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`
    pub created_to: Option<DateTime<Utc>>,
}

impl ApplicationFilter {
    pub fn by_status(status: ApplicationStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn by_priority(priority: Priority) -> Self {
        Self {
            priority: Some(priority),
            ..Default::default()
        }
    }

    pub fn by_workflow(workflow_type: WorkflowType) -> Self {
        Self {
            workflow_type: Some(workflow_type),
            ..Default::default()
        }
    }

    pub fn by_text(text: &str) -> Self {
        Self {
            text: Some(text.trim().to_string()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &ApplicationFilter::default()
    }

    pub fn matches(&self, app: &Application) -> bool {
        if let Some(status) = self.status {
            if app.status != status {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if app.priority != priority {
                return false;
            }
        }
        if let Some(workflow_type) = self.workflow_type {
            if app.workflow_type != workflow_type {
                return false;
            }
        }
        if let Some(from) = self.created_from {
            if app.created_at < from {
                return false;
            }
        }
        if let Some(to) = self.created_to {
            if app.created_at > to {
                return false;
            }
        }
        match self.text.as_deref() {
            Some(text) if !text.is_empty() => text_matches(app, text),
            _ => true,
        }
    }

    /// Records matching every predicate, in their original order
    pub fn apply<'a>(&self, apps: &'a [Application]) -> Vec<&'a Application> {
        apps.iter().filter(|app| self.matches(app)).collect()
    }
}

fn text_matches(app: &Application, query: &str) -> bool {
    let needle = query.to_lowercase();
    [
        app.id.as_str(),
        app.client_name.as_str(),
        app.client_phone.as_str(),
        app.address.as_str(),
        app.description.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// Quick date ranges offered by the filter menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePreset {
    Today,
    Week,
    Month,
}

impl DatePreset {
    pub fn code(self) -> &'static str {
        match self {
            DatePreset::Today => "today",
            DatePreset::Week => "week",
            DatePreset::Month => "month",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "today" => Some(DatePreset::Today),
            "week" => Some(DatePreset::Week),
            "month" => Some(DatePreset::Month),
            _ => None,
        }
    }

    pub fn label_key(self) -> &'static str {
        match self {
            DatePreset::Today => "filter-date-today",
            DatePreset::Week => "filter-date-week",
            DatePreset::Month => "filter-date-month",
        }
    }

    /// Inclusive `(from, to)` range ending at `now`
    pub fn range(self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let from = match self {
            DatePreset::Today => now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .map(|midnight| midnight.and_utc())
                .unwrap_or(now - Duration::hours(24)),
            DatePreset::Week => now - Duration::days(7),
            DatePreset::Month => now - Duration::days(30),
        };
        (from, now)
    }
}

/// Applications waiting for a manager decision: new or handed back
pub fn inbox(apps: &[Application]) -> Vec<&Application> {
    apps.iter()
        .filter(|app| {
            matches!(
                app.status,
                ApplicationStatus::Created | ApplicationStatus::Transferred
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_data::seed_applications;

    #[test]
    fn test_empty_filter_matches_everything() {
        let apps = seed_applications(Utc::now());
        let filter = ApplicationFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&apps).len(), apps.len());
    }

    #[test]
    fn test_blank_text_is_ignored() {
        let apps = seed_applications(Utc::now());
        let filter = ApplicationFilter::by_text("   ");
        assert_eq!(filter.apply(&apps).len(), apps.len());
    }

    #[test]
    fn test_today_starts_at_midnight() {
        let now = DateTime::parse_from_rfc3339("2024-05-10T15:30:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let (from, to) = DatePreset::Today.range(now);
        assert_eq!(from.to_rfc3339(), "2024-05-10T00:00:00+00:00");
        assert_eq!(to, now);
    }
}
