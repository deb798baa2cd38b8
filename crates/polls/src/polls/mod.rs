//! Published polls, their choices, and the vote recorder.

pub mod domain;
pub mod fixture;
pub mod repository;
pub mod router;
pub mod service;
pub mod visibility;

#[cfg(test)]
mod tests;

pub use domain::{
    Choice, ChoiceId, ChoiceView, NewChoice, NewPoll, Poll, PollDetail, PollId, PollSummary,
};
pub use fixture::{FixtureError, FixtureSummary, PollFixture};
pub use repository::{PollRepository, RepositoryError};
pub use router::{
    poll_router, results_path, PollIndexView, VoteForm, VoteFormView, EMPTY_INDEX_MESSAGE,
};
pub use service::{PollService, PollServiceError, LATEST_POLL_LIMIT, MISSING_CHOICE_MESSAGE};
