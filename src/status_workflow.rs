//! Status transition whitelist for applications.
//!
//! `completed` is terminal; `cancelled` may only be reopened to `created`.

use crate::errors::{AppError, AppResult};
use crate::models::ApplicationStatus;

use ApplicationStatus::*;

/// Statuses reachable from `status` in one step
pub fn allowed_next(status: ApplicationStatus) -> &'static [ApplicationStatus] {
    match status {
        Created => &[Assigned, InProgress, Cancelled, Transferred],
        Assigned => &[InProgress, Pending, Cancelled, Transferred],
        InProgress => &[Pending, Completed, Cancelled, Transferred],
        Pending => &[InProgress, Completed, Cancelled],
        Transferred => &[Assigned, InProgress, Cancelled],
        Cancelled => &[Created],
        Completed => &[],
    }
}

pub fn can_transition(from: ApplicationStatus, to: ApplicationStatus) -> bool {
    allowed_next(from).contains(&to)
}

/// Returns `InvalidTransition` unless the table allows `from -> to`
pub fn check_transition(from: ApplicationStatus, to: ApplicationStatus) -> AppResult<()> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(AppError::InvalidTransition { from, to })
    }
}

pub fn is_terminal(status: ApplicationStatus) -> bool {
    allowed_next(status).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_self_transitions() {
        for status in ApplicationStatus::ALL {
            assert!(!can_transition(status, status), "{:?}", status);
        }
    }

    #[test]
    fn test_only_completed_is_terminal() {
        let terminal: Vec<_> = ApplicationStatus::ALL
            .into_iter()
            .filter(|s| is_terminal(*s))
            .collect();
        assert_eq!(terminal, vec![Completed]);
    }
}
