use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::visibility;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PollId(pub u64);

impl fmt::Display for PollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChoiceId(pub u64);

impl fmt::Display for ChoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A question opened for voting once `pub_date` has passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Poll {
    pub id: PollId,
    pub question: String,
    pub pub_date: DateTime<Utc>,
}

impl Poll {
    pub fn was_published_recently(&self, now: DateTime<Utc>) -> bool {
        visibility::was_published_recently(self.pub_date, now)
    }
}

/// An answer option owned by exactly one poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub id: ChoiceId,
    pub poll_id: PollId,
    pub text: String,
    pub votes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewPoll {
    pub question: String,
    pub pub_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewChoice {
    pub poll_id: PollId,
    pub text: String,
    #[serde(default)]
    pub votes: u64,
}

/// Row of the latest-polls listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollSummary {
    pub id: PollId,
    pub question: String,
    pub pub_date: DateTime<Utc>,
    pub was_published_recently: bool,
}

impl PollSummary {
    pub fn new(poll: &Poll, now: DateTime<Utc>) -> Self {
        Self {
            id: poll.id,
            question: poll.question.clone(),
            pub_date: poll.pub_date,
            was_published_recently: poll.was_published_recently(now),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChoiceView {
    pub id: ChoiceId,
    pub text: String,
    pub votes: u64,
}

impl From<&Choice> for ChoiceView {
    fn from(choice: &Choice) -> Self {
        Self {
            id: choice.id,
            text: choice.text.clone(),
            votes: choice.votes,
        }
    }
}

/// Poll with its choices, shared by the detail and results pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollDetail {
    pub id: PollId,
    pub question: String,
    pub pub_date: DateTime<Utc>,
    pub choices: Vec<ChoiceView>,
    pub total_votes: u64,
}

impl PollDetail {
    pub fn new(poll: &Poll, choices: &[Choice]) -> Self {
        let choices: Vec<ChoiceView> = choices.iter().map(ChoiceView::from).collect();
        let total_votes = choices.iter().map(|choice| choice.votes).sum();
        Self {
            id: poll.id,
            question: poll.question.clone(),
            pub_date: poll.pub_date,
            choices,
            total_votes,
        }
    }

    pub fn choice(&self, id: ChoiceId) -> Option<&ChoiceView> {
        self.choices.iter().find(|choice| choice.id == id)
    }
}
