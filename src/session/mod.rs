//! Per-user conversation records and where they are kept.

pub mod store;

pub use store::{InMemorySessionStore, SessionStore};

use crate::exercises::{ExerciseId, ExerciseOutcome};
use chrono::{DateTime, Duration, Utc};

pub type UserId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    /// Top-level menu.
    Main,
    /// An exercise is selected and waiting for data or commands.
    Task(ExerciseId),
    /// Digit arithmetic was executed without an operation; waiting for `+` or `-`.
    AwaitOperator,
}

/// Inputs collected for the selected exercise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExerciseData {
    Reconcile {
        first: Vec<i64>,
        second: Vec<i64>,
    },
    Digits {
        first: Vec<i64>,
        second: Vec<i64>,
        operation: Option<String>,
    },
    Subarray {
        values: Vec<i64>,
        target: i64,
    },
}

impl ExerciseData {
    pub fn exercise(&self) -> ExerciseId {
        match self {
            ExerciseData::Reconcile { .. } => ExerciseId::Reconcile,
            ExerciseData::Digits { .. } => ExerciseId::Digits,
            ExerciseData::Subarray { .. } => ExerciseId::Subarray,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub state: ChatState,
    pub task: Option<ExerciseId>,
    pub data: Option<ExerciseData>,
    pub result: Option<ExerciseOutcome>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            state: ChatState::Main,
            task: None,
            data: None,
            result: None,
            created_at: now,
            last_active: now,
        }
    }

    /// Back to the main menu, forgetting the exercise and everything collected for it.
    pub fn reset(&mut self) {
        self.state = ChatState::Main;
        self.task = None;
        self.data = None;
        self.result = None;
    }

    pub fn select(&mut self, exercise: ExerciseId) {
        self.state = ChatState::Task(exercise);
        self.task = Some(exercise);
        self.data = None;
        self.result = None;
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.created_at
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_survives_reset() {
        let mut session = Session::new();
        let created = session.created_at;
        session.select(ExerciseId::Digits);
        session.reset();
        session.touch();

        assert_eq!(session.created_at, created);
        assert_eq!(session.age(created + Duration::seconds(90)), Duration::seconds(90));
        assert!(session.last_active >= created);
    }
}
