use crate::infra::{parse_timestamp, InMemoryPollRepository};
use chrono::{DateTime, Utc};
use clap::Args;
use polls::error::AppError;
use polls::polls::{PollDetail, PollFixture, PollId, PollService, PollSummary};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct PollListArgs {
    /// JSON fixture describing polls and choices
    #[arg(long)]
    pub(crate) fixture: PathBuf,
    /// Evaluate visibility at this RFC 3339 instant (defaults to now)
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
}

#[derive(Args, Debug)]
pub(crate) struct PollResultsArgs {
    /// JSON fixture describing polls and choices
    #[arg(long)]
    pub(crate) fixture: PathBuf,
    /// Identifier of the poll, in fixture order starting at 1
    #[arg(long)]
    pub(crate) poll_id: u64,
    /// Evaluate visibility at this RFC 3339 instant (defaults to now)
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) now: Option<DateTime<Utc>>,
}

pub(crate) fn run_poll_list(args: PollListArgs) -> Result<(), AppError> {
    let now = args.now.unwrap_or_else(Utc::now);
    let service = load_service(&args.fixture, now)?;
    let polls = service.latest(now)?;
    print!("{}", render_poll_list(&polls, now));
    Ok(())
}

pub(crate) fn run_poll_results(args: PollResultsArgs) -> Result<(), AppError> {
    let now = args.now.unwrap_or_else(Utc::now);
    let service = load_service(&args.fixture, now)?;
    let results = service.results(PollId(args.poll_id), now)?;
    print!("{}", render_poll_results(&results));
    Ok(())
}

fn load_service(
    fixture: &Path,
    now: DateTime<Utc>,
) -> Result<PollService<InMemoryPollRepository>, AppError> {
    let repository = Arc::new(InMemoryPollRepository::default());
    PollFixture::from_path(fixture)?.load_into(repository.as_ref(), now)?;
    Ok(PollService::new(repository))
}

pub(crate) fn render_poll_list(polls: &[PollSummary], now: DateTime<Utc>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Latest polls (as of {})", now.format("%Y-%m-%d %H:%M UTC"));

    if polls.is_empty() {
        let _ = writeln!(out, "No polls are available.");
        return out;
    }

    for poll in polls {
        let marker = if poll.was_published_recently {
            " [new]"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "- #{} {} (published {}){}",
            poll.id,
            poll.question,
            poll.pub_date.format("%Y-%m-%d"),
            marker
        );
    }
    out
}

pub(crate) fn render_poll_results(results: &PollDetail) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", results.question);
    for choice in &results.choices {
        let noun = if choice.votes == 1 { "vote" } else { "votes" };
        let _ = writeln!(out, "- {} -- {} {}", choice.text, choice.votes, noun);
    }
    let _ = writeln!(out, "Total: {}", results.total_votes);
    out
}
