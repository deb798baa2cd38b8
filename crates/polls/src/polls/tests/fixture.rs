use super::common::*;
use crate::polls::domain::PollId;
use crate::polls::repository::PollRepository;
use crate::polls::{FixtureError, FixtureSummary, PollFixture};
use chrono::Duration;
use std::io::Cursor;

const SAMPLE: &str = r#"{
  "polls": [
    { "question": "What's up?", "published_days_ago": 2,
      "choices": ["Not much", { "text": "The sky", "votes": 3 }] },
    { "question": "Scheduled", "pub_date": "2030-01-01T00:00:00Z", "choices": ["Yes"] },
    { "question": "Draft", "published_days_ago": 1 }
  ]
}"#;

#[test]
fn loads_polls_and_choices_in_document_order() {
    let repository = MemoryRepository::default();
    let now = fixed_now();

    let fixture = PollFixture::from_reader(Cursor::new(SAMPLE)).expect("fixture parses");
    let summary = fixture.load_into(&repository, now).expect("fixture loads");

    assert_eq!(
        summary,
        FixtureSummary {
            polls: 3,
            choices: 3
        }
    );

    let first = repository
        .fetch_poll(PollId(1))
        .expect("fetch succeeds")
        .expect("poll present");
    assert_eq!(first.question, "What's up?");
    assert_eq!(first.pub_date, now - Duration::days(2));
    assert_eq!(repository.votes(PollId(1)), vec![0, 3]);
    assert!(repository.choices_for(PollId(3)).expect("choices").is_empty());
}

#[test]
fn seeded_store_only_lists_eligible_polls() {
    let (service, repository) = build_service();
    let now = fixed_now();
    PollFixture::from_reader(Cursor::new(SAMPLE))
        .and_then(|fixture| fixture.load_into(repository.as_ref(), now))
        .expect("fixture loads");

    let listed: Vec<String> = service
        .latest(now)
        .expect("listing")
        .into_iter()
        .map(|poll| poll.question)
        .collect();
    assert_eq!(listed, vec!["What's up?".to_string()]);
}

#[test]
fn rejects_entries_without_a_publish_date() {
    let raw = r#"{ "polls": [ { "question": "When?", "choices": ["Now"] } ] }"#;
    match PollFixture::from_reader(Cursor::new(raw)) {
        Err(FixtureError::Invalid { index: 0, reason }) => {
            assert!(reason.contains("pub_date"));
        }
        other => panic!("expected invalid entry, got {other:?}"),
    }
}

#[test]
fn rejects_blank_questions_and_conflicting_dates() {
    let blank = r#"{ "polls": [ { "question": " ", "published_days_ago": 1 } ] }"#;
    assert!(matches!(
        PollFixture::from_reader(Cursor::new(blank)),
        Err(FixtureError::Invalid { index: 0, .. })
    ));

    let both = r#"{ "polls": [
        { "question": "Ok", "published_days_ago": 1 },
        { "question": "Both", "published_days_ago": 1, "pub_date": "2024-01-01T00:00:00Z" }
    ] }"#;
    assert!(matches!(
        PollFixture::from_reader(Cursor::new(both)),
        Err(FixtureError::Invalid { index: 1, .. })
    ));
}

#[test]
fn surfaces_json_errors() {
    assert!(matches!(
        PollFixture::from_reader(Cursor::new("{ \"polls\": [")),
        Err(FixtureError::Json(_))
    ));
}

#[test]
fn repository_failures_abort_the_load() {
    let fixture = PollFixture::from_reader(Cursor::new(SAMPLE)).expect("fixture parses");
    assert!(matches!(
        fixture.load_into(&UnavailableRepository, fixed_now()),
        Err(FixtureError::Repository(_))
    ));
}

#[test]
fn out_of_range_day_offsets_are_invalid() {
    for days in [i64::MAX, i64::MIN, 400_000_000] {
        let raw = format!(
            r#"{{ "polls": [ {{ "question": "Ages ago", "published_days_ago": {days} }} ] }}"#
        );
        let repository = MemoryRepository::default();
        let fixture = PollFixture::from_reader(Cursor::new(raw)).expect("fixture parses");

        match fixture.load_into(&repository, fixed_now()) {
            Err(FixtureError::Invalid { index: 0, reason }) => {
                assert_eq!(reason, "published_days_ago is out of range");
            }
            other => panic!("expected out of range for {days}, got {other:?}"),
        }
        assert!(repository.polls().expect("polls").is_empty());
    }
}
