//! Tracks which sessions have an analysis in flight.
//!
//! A session may have at most one pending submission per use case. A second
//! submission is refused rather than queued, like a disabled submit button.

use common::models::UseCase;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

type Key = (String, UseCase);

#[derive(Debug, Default)]
pub struct SubmissionGuard {
    pending: Mutex<HashSet<Key>>,
}

/// Held while a submission is in the `Submitting` state.
#[derive(Debug)]
pub struct SubmissionPermit {
    guard: Arc<SubmissionGuard>,
    key: Key,
}

impl SubmissionGuard {
    /// Returns `None` when the session already has this use case pending.
    pub fn begin(self: &Arc<Self>, session: &str, use_case: UseCase) -> Option<SubmissionPermit> {
        let key = (session.to_string(), use_case);
        let inserted = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone());

        inserted.then(|| SubmissionPermit {
            guard: Arc::clone(self),
            key,
        })
    }
}

impl Drop for SubmissionPermit {
    fn drop(&mut self) {
        self.guard
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_submission_is_refused_while_pending() {
        let guard = Arc::new(SubmissionGuard::default());
        let permit = guard.begin("session-a", UseCase::SymptomAnalysis);
        assert!(permit.is_some());
        assert!(guard.begin("session-a", UseCase::SymptomAnalysis).is_none());
    }

    #[test]
    fn finishing_returns_session_to_idle() {
        let guard = Arc::new(SubmissionGuard::default());
        let permit = guard.begin("session-a", UseCase::Nutrition);
        assert!(guard.begin("session-a", UseCase::Nutrition).is_none());
        drop(permit);
        assert!(guard.begin("session-a", UseCase::Nutrition).is_some());
    }

    #[test]
    fn sessions_and_use_cases_are_independent() {
        let guard = Arc::new(SubmissionGuard::default());
        let _a = guard.begin("session-a", UseCase::LabReport).unwrap();
        assert!(guard.begin("session-b", UseCase::LabReport).is_some());
        assert!(guard.begin("session-a", UseCase::YouthHealth).is_some());
    }
}
