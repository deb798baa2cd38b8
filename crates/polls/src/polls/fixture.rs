//! JSON seed documents for the poll store.
//!
//! ```json
//! { "polls": [
//!     { "question": "What's up?", "published_days_ago": 2,
//!       "choices": ["Not much", { "text": "The sky", "votes": 3 }] },
//!     { "question": "Later?", "pub_date": "2030-01-01T00:00:00Z", "choices": [] }
//! ] }
//! ```
//!
//! A negative `published_days_ago` schedules the poll in the future.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use super::domain::{NewChoice, NewPoll};
use super::repository::{PollRepository, RepositoryError};

#[derive(Debug)]
pub enum FixtureError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid { index: usize, reason: &'static str },
    Repository(RepositoryError),
}

impl std::fmt::Display for FixtureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixtureError::Io(err) => write!(f, "failed to read poll fixture: {}", err),
            FixtureError::Json(err) => write!(f, "invalid poll fixture JSON: {}", err),
            FixtureError::Invalid { index, reason } => {
                write!(f, "poll fixture entry {} is invalid: {}", index, reason)
            }
            FixtureError::Repository(err) => {
                write!(f, "could not store poll fixture: {}", err)
            }
        }
    }
}

impl std::error::Error for FixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FixtureError::Io(err) => Some(err),
            FixtureError::Json(err) => Some(err),
            FixtureError::Invalid { .. } => None,
            FixtureError::Repository(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for FixtureError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for FixtureError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<RepositoryError> for FixtureError {
    fn from(err: RepositoryError) -> Self {
        Self::Repository(err)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollFixture {
    pub polls: Vec<PollEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollEntry {
    pub question: String,
    #[serde(default)]
    pub pub_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub published_days_ago: Option<i64>,
    #[serde(default)]
    pub choices: Vec<ChoiceEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ChoiceEntry {
    Text(String),
    Counted {
        text: String,
        #[serde(default)]
        votes: u64,
    },
}

impl ChoiceEntry {
    fn into_parts(self) -> (String, u64) {
        match self {
            ChoiceEntry::Text(text) => (text, 0),
            ChoiceEntry::Counted { text, votes } => (text, votes),
        }
    }
}

/// Polls and choices written by [`PollFixture::load_into`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixtureSummary {
    pub polls: usize,
    pub choices: usize,
}

impl PollFixture {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FixtureError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, FixtureError> {
        let fixture: PollFixture = serde_json::from_reader(reader)?;
        fixture.validate()?;
        Ok(fixture)
    }

    fn validate(&self) -> Result<(), FixtureError> {
        for (index, entry) in self.polls.iter().enumerate() {
            if entry.question.trim().is_empty() {
                return Err(FixtureError::Invalid {
                    index,
                    reason: "question text is empty",
                });
            }
            match (entry.pub_date, entry.published_days_ago) {
                (Some(_), Some(_)) => {
                    return Err(FixtureError::Invalid {
                        index,
                        reason: "set either pub_date or published_days_ago, not both",
                    })
                }
                (None, None) => {
                    return Err(FixtureError::Invalid {
                        index,
                        reason: "missing pub_date or published_days_ago",
                    })
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Insert every poll, then its choices in document order.
    pub fn load_into<R>(
        self,
        repository: &R,
        now: DateTime<Utc>,
    ) -> Result<FixtureSummary, FixtureError>
    where
        R: PollRepository + ?Sized,
    {
        let mut summary = FixtureSummary::default();

        for (index, entry) in self.polls.into_iter().enumerate() {
            let pub_date = match (entry.pub_date, entry.published_days_ago) {
                (Some(date), None) => date,
                (None, Some(days)) => Duration::try_days(days)
                    .and_then(|offset| now.checked_sub_signed(offset))
                    .ok_or(FixtureError::Invalid {
                        index,
                        reason: "published_days_ago is out of range",
                    })?,
                _ => {
                    return Err(FixtureError::Invalid {
                        index,
                        reason: "missing pub_date or published_days_ago",
                    })
                }
            };

            let poll = repository.insert_poll(NewPoll {
                question: entry.question,
                pub_date,
            })?;
            summary.polls += 1;

            for choice in entry.choices {
                let (text, votes) = choice.into_parts();
                repository.insert_choice(NewChoice {
                    poll_id: poll.id,
                    text,
                    votes,
                })?;
                summary.choices += 1;
            }
        }

        Ok(summary)
    }
}
