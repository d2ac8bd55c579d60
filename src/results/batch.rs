use crate::types::CursorId;

/// Result of one statement in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success(CursorId),
    Failure { code: String, message: String },
}

/// A statement of a batch together with what happened when it ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementOutcome {
    pub sql: String,
    pub outcome: Outcome,
}

impl StatementOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, Outcome::Success(_))
    }
}

/// Ordered per-statement outcomes of a batch.
///
/// Under [`ErrorPolicy::Abort`](crate::types::ErrorPolicy::Abort) the sequence ends with the
/// first failure; otherwise it holds one entry per statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResult {
    outcomes: Vec<StatementOutcome>,
}

impl BatchResult {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            outcomes: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push_success(&mut self, sql: String, cursor: CursorId) {
        self.outcomes.push(StatementOutcome {
            sql,
            outcome: Outcome::Success(cursor),
        });
    }

    pub(crate) fn push_failure(&mut self, sql: String, code: String, message: String) {
        self.outcomes.push(StatementOutcome {
            sql,
            outcome: Outcome::Failure { code, message },
        });
    }

    #[must_use]
    pub fn outcomes(&self) -> &[StatementOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Coarse batch status: `false` when any statement failed, even if later ones succeeded.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.outcomes.iter().all(StatementOutcome::is_success)
    }

    /// The last failure of the batch, its representative error.
    #[must_use]
    pub fn last_error(&self) -> Option<(&str, &str)> {
        self.outcomes.iter().rev().find_map(|o| match &o.outcome {
            Outcome::Failure { code, message } => Some((code.as_str(), message.as_str())),
            Outcome::Success(_) => None,
        })
    }

    /// Number of statements that failed.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }
}

impl IntoIterator for BatchResult {
    type Item = StatementOutcome;
    type IntoIter = std::vec::IntoIter<StatementOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.into_iter()
    }
}
