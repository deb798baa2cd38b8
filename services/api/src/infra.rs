use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use polls::polls::{
    Choice, ChoiceId, NewChoice, NewPoll, Poll, PollId, PollRepository, RepositoryError,
};
use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default)]
struct PollTables {
    polls: BTreeMap<PollId, Poll>,
    choices: BTreeMap<ChoiceId, Choice>,
    next_poll_id: u64,
    next_choice_id: u64,
}

/// Process-local poll store; contents are lost on restart.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPollRepository {
    tables: Arc<Mutex<PollTables>>,
}

impl PollRepository for InMemoryPollRepository {
    fn insert_poll(&self, poll: NewPoll) -> Result<Poll, RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        guard.next_poll_id += 1;
        let poll = Poll {
            id: PollId(guard.next_poll_id),
            question: poll.question,
            pub_date: poll.pub_date,
        };
        guard.polls.insert(poll.id, poll.clone());
        Ok(poll)
    }

    fn insert_choice(&self, choice: NewChoice) -> Result<Choice, RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        if !guard.polls.contains_key(&choice.poll_id) {
            return Err(RepositoryError::PollNotFound(choice.poll_id));
        }
        guard.next_choice_id += 1;
        let choice = Choice {
            id: ChoiceId(guard.next_choice_id),
            poll_id: choice.poll_id,
            text: choice.text,
            votes: choice.votes,
        };
        guard.choices.insert(choice.id, choice.clone());
        Ok(choice)
    }

    fn polls(&self) -> Result<Vec<Poll>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard.polls.values().cloned().collect())
    }

    fn fetch_poll(&self, id: PollId) -> Result<Option<Poll>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard.polls.get(&id).cloned())
    }

    fn choices_for(&self, poll_id: PollId) -> Result<Vec<Choice>, RepositoryError> {
        let guard = self.tables.lock().expect("repository mutex poisoned");
        Ok(guard
            .choices
            .values()
            .filter(|choice| choice.poll_id == poll_id)
            .cloned()
            .collect())
    }

    fn update_choice(&self, choice: Choice) -> Result<(), RepositoryError> {
        let mut guard = self.tables.lock().expect("repository mutex poisoned");
        match guard.choices.get_mut(&choice.id) {
            Some(stored) if stored.poll_id == choice.poll_id => {
                *stored = choice;
                Ok(())
            }
            _ => Err(RepositoryError::ChoiceNotFound(choice.id)),
        }
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|value| value.with_timezone(&Utc))
        .map_err(|err| format!("failed to parse '{raw}' as an RFC 3339 timestamp ({err})"))
}
