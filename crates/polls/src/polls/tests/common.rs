use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::polls::domain::{Choice, ChoiceId, NewChoice, NewPoll, Poll, PollId};
use crate::polls::repository::{PollRepository, RepositoryError};
use crate::polls::{poll_router, PollService};

pub(super) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 24, 9, 30, 0)
        .single()
        .expect("valid timestamp")
}

#[derive(Default)]
struct MemoryState {
    polls: BTreeMap<PollId, Poll>,
    choices: BTreeMap<ChoiceId, Choice>,
    next_poll: u64,
    next_choice: u64,
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryRepository {
    pub(super) fn votes(&self, poll_id: PollId) -> Vec<u64> {
        self.choices_for(poll_id)
            .expect("memory repository never fails")
            .iter()
            .map(|choice| choice.votes)
            .collect()
    }
}

impl PollRepository for MemoryRepository {
    fn insert_poll(&self, poll: NewPoll) -> Result<Poll, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        guard.next_poll += 1;
        let poll = Poll {
            id: PollId(guard.next_poll),
            question: poll.question,
            pub_date: poll.pub_date,
        };
        guard.polls.insert(poll.id, poll.clone());
        Ok(poll)
    }

    fn insert_choice(&self, choice: NewChoice) -> Result<Choice, RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        if !guard.polls.contains_key(&choice.poll_id) {
            return Err(RepositoryError::PollNotFound(choice.poll_id));
        }
        guard.next_choice += 1;
        let choice = Choice {
            id: ChoiceId(guard.next_choice),
            poll_id: choice.poll_id,
            text: choice.text,
            votes: choice.votes,
        };
        guard.choices.insert(choice.id, choice.clone());
        Ok(choice)
    }

    fn polls(&self) -> Result<Vec<Poll>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard.polls.values().cloned().collect())
    }

    fn fetch_poll(&self, id: PollId) -> Result<Option<Poll>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard.polls.get(&id).cloned())
    }

    fn choices_for(&self, poll_id: PollId) -> Result<Vec<Choice>, RepositoryError> {
        let guard = self.state.lock().expect("repository mutex poisoned");
        Ok(guard
            .choices
            .values()
            .filter(|choice| choice.poll_id == poll_id)
            .cloned()
            .collect())
    }

    fn update_choice(&self, choice: Choice) -> Result<(), RepositoryError> {
        let mut guard = self.state.lock().expect("repository mutex poisoned");
        match guard.choices.get_mut(&choice.id) {
            Some(stored) => {
                *stored = choice;
                Ok(())
            }
            None => Err(RepositoryError::ChoiceNotFound(choice.id)),
        }
    }
}

pub(super) struct UnavailableRepository;

impl PollRepository for UnavailableRepository {
    fn insert_poll(&self, _poll: NewPoll) -> Result<Poll, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn insert_choice(&self, _choice: NewChoice) -> Result<Choice, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn polls(&self) -> Result<Vec<Poll>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch_poll(&self, _id: PollId) -> Result<Option<Poll>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn choices_for(&self, _poll_id: PollId) -> Result<Vec<Choice>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update_choice(&self, _choice: Choice) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Insert a poll published `days` from `now` (negative for the past).
pub(super) fn create_poll(
    repository: &MemoryRepository,
    question: &str,
    days: i64,
    now: DateTime<Utc>,
) -> Poll {
    repository
        .insert_poll(NewPoll {
            question: question.to_string(),
            pub_date: now + Duration::days(days),
        })
        .expect("poll inserted")
}

pub(super) fn create_poll_with_choices(
    repository: &MemoryRepository,
    question: &str,
    days: i64,
    now: DateTime<Utc>,
    choices: &[&str],
) -> (Poll, Vec<Choice>) {
    let poll = create_poll(repository, question, days, now);
    let choices = choices
        .iter()
        .map(|text| {
            repository
                .insert_choice(NewChoice {
                    poll_id: poll.id,
                    text: text.to_string(),
                    votes: 0,
                })
                .expect("choice inserted")
        })
        .collect();
    (poll, choices)
}

pub(super) fn build_service() -> (PollService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = PollService::new(repository.clone());
    (service, repository)
}

pub(super) fn router_with(repository: Arc<MemoryRepository>) -> axum::Router {
    poll_router(Arc::new(PollService::new(repository)))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
