use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::domain::{Choice, ChoiceId, Poll, PollDetail, PollId, PollSummary};
use super::repository::{PollRepository, RepositoryError};
use super::visibility;

/// Number of polls shown on the index page.
pub const LATEST_POLL_LIMIT: usize = 5;

pub const MISSING_CHOICE_MESSAGE: &str = "You didn't select a choice.";

/// Read views over published polls plus the vote recorder.
pub struct PollService<R> {
    repository: Arc<R>,
}

impl<R> PollService<R>
where
    R: PollRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Most recently published eligible polls, newest first.
    pub fn latest(&self, now: DateTime<Utc>) -> Result<Vec<PollSummary>, PollServiceError> {
        let mut eligible = Vec::new();
        for poll in self.repository.polls()? {
            if !visibility::is_published(poll.pub_date, now) {
                continue;
            }
            if self.repository.choices_for(poll.id)?.is_empty() {
                continue;
            }
            eligible.push(poll);
        }

        eligible.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(b.id.cmp(&a.id)));
        eligible.truncate(LATEST_POLL_LIMIT);

        Ok(eligible
            .iter()
            .map(|poll| PollSummary::new(poll, now))
            .collect())
    }

    /// Poll and its choices, hidden until published and while choiceless.
    pub fn detail(
        &self,
        poll_id: PollId,
        now: DateTime<Utc>,
    ) -> Result<PollDetail, PollServiceError> {
        let (poll, choices) = self.eligible_poll(poll_id, now)?;
        Ok(PollDetail::new(&poll, &choices))
    }

    /// Vote tallies; same visibility as [`PollService::detail`].
    pub fn results(
        &self,
        poll_id: PollId,
        now: DateTime<Utc>,
    ) -> Result<PollDetail, PollServiceError> {
        self.detail(poll_id, now)
    }

    /// Record one vote for `submitted` among the poll's choices.
    ///
    /// A missing, malformed, or foreign choice id leaves every counter
    /// untouched and returns the poll detail for re-rendering the form.
    pub fn vote(
        &self,
        poll_id: PollId,
        submitted: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Choice, PollServiceError> {
        let (poll, choices) = self.eligible_poll(poll_id, now)?;

        let selected = parse_choice_id(submitted).and_then(|choice_id| {
            choices
                .iter()
                .find(|choice| choice.id == choice_id)
                .cloned()
        });

        let Some(mut choice) = selected else {
            debug!(%poll_id, submitted = ?submitted, "vote rejected without a valid choice");
            return Err(PollServiceError::MissingChoice {
                detail: Box::new(PollDetail::new(&poll, &choices)),
            });
        };

        choice.votes = choice
            .votes
            .checked_add(1)
            .ok_or(RepositoryError::CounterSaturated(choice.id))?;
        self.repository.update_choice(choice.clone())?;

        info!(%poll_id, choice_id = %choice.id, votes = choice.votes, "vote recorded");
        Ok(choice)
    }

    fn eligible_poll(
        &self,
        poll_id: PollId,
        now: DateTime<Utc>,
    ) -> Result<(Poll, Vec<Choice>), PollServiceError> {
        let poll = self
            .repository
            .fetch_poll(poll_id)?
            .ok_or(PollServiceError::NotFound(poll_id))?;
        let choices = self.repository.choices_for(poll_id)?;

        if visibility::is_eligible(&poll, choices.len(), now) {
            Ok((poll, choices))
        } else {
            Err(PollServiceError::NotFound(poll_id))
        }
    }
}

fn parse_choice_id(raw: Option<&str>) -> Option<ChoiceId> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<u64>().ok())
        .map(ChoiceId)
}

/// Error raised by the poll service.
#[derive(Debug, thiserror::Error)]
pub enum PollServiceError {
    #[error("poll {0} not found")]
    NotFound(PollId),
    #[error("You didn't select a choice.")]
    MissingChoice { detail: Box<PollDetail> },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
