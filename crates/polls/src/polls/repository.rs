use super::domain::{Choice, ChoiceId, NewChoice, NewPoll, Poll, PollId};

/// Storage abstraction so the service module can be exercised in isolation.
///
/// Implementations assign identifiers on insert and keep choices in insertion
/// order. `update_choice` overwrites the stored row; there is no
/// compare-and-swap, so concurrent read-modify-write cycles can lose updates.
pub trait PollRepository: Send + Sync {
    fn insert_poll(&self, poll: NewPoll) -> Result<Poll, RepositoryError>;
    fn insert_choice(&self, choice: NewChoice) -> Result<Choice, RepositoryError>;
    fn polls(&self) -> Result<Vec<Poll>, RepositoryError>;
    fn fetch_poll(&self, id: PollId) -> Result<Option<Poll>, RepositoryError>;
    fn choices_for(&self, poll_id: PollId) -> Result<Vec<Choice>, RepositoryError>;
    fn update_choice(&self, choice: Choice) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("poll {0} not found")]
    PollNotFound(PollId),
    #[error("choice {0} not found")]
    ChoiceNotFound(ChoiceId),
    #[error("vote counter for choice {0} cannot grow")]
    CounterSaturated(ChoiceId),
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
