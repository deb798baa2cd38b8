//! Publish rules deciding which polls may be listed, viewed, or voted on.

use chrono::{DateTime, Duration, Utc};

use super::domain::Poll;

/// `now - 1 day < pub_date <= now`.
pub fn was_published_recently(pub_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - Duration::days(1) < pub_date && pub_date <= now
}

pub fn is_published(pub_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    pub_date <= now
}

/// A poll is public once published and only while it owns a choice.
pub fn is_eligible(poll: &Poll, choice_count: usize, now: DateTime<Utc>) -> bool {
    is_published(poll.pub_date, now) && choice_count > 0
}
