//! Bulk message deletion for the `clear` command.
//!
//! A purge moves through `validating → fetching → filtering → deleting → reporting`
//! and can abort from the first three stages. The stages are written against the
//! [`MessageChannel`] trait so the flow runs the same way against Discord and
//! against the in-memory channel used in tests.

use crate::errors::Result;
use chrono::{DateTime, TimeDelta, Utc};
use poise::serenity_prelude::{MessageId, UserId};
use std::future::Future;

/// Messages fetched per request when filtering by author. Discord's maximum.
pub const AUTHOR_FILTER_BATCH: u8 = 100;

/// Discord refuses to bulk delete messages older than this many days.
pub const BULK_DELETE_MAX_AGE_DAYS: i64 = 14;

/// A fetched message, reduced to what the purge needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Message id
    pub id: MessageId,
    /// Author of the message
    pub author: UserId,
    /// When the message was sent
    pub created_at: DateTime<Utc>,
}

/// The parameters of one `clear` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeRequest {
    /// Number of messages requested (1-100)
    pub amount: u8,
    /// Only delete messages written by this user
    pub author: Option<UserId>,
    /// Whether the channel can hold text messages
    pub text_capable: bool,
    /// Whether the bot holds Manage Messages in the channel
    pub can_manage_messages: bool,
}

/// Why a purge stopped before deleting anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeAbort {
    /// The channel cannot hold text messages
    NotTextChannel,
    /// The bot lacks Manage Messages
    MissingPermission,
    /// Fetching (and author filtering) produced no messages
    NothingFound,
    /// Every candidate is past the bulk delete ceiling
    AllTooOld,
}

impl PurgeAbort {
    /// User-facing explanation.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotTextChannel => "❌ This command can only be used in text channels.",
            Self::MissingPermission => {
                "❌ I need the \"Manage Messages\" permission to use this command."
            }
            Self::NothingFound => "❌ No messages found to delete.",
            Self::AllTooOld => {
                "❌ All selected messages are older than 14 days and cannot be bulk deleted."
            }
        }
    }
}

/// Counts reported once a purge finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurgeReport {
    /// Messages actually deleted
    pub deleted: usize,
    /// Messages left alone because they are older than 14 days
    pub skipped_too_old: usize,
}

/// Terminal state of a purge after validation passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeOutcome {
    /// Messages were deleted
    Completed(PurgeReport),
    /// Stopped early
    Aborted(PurgeAbort),
}

/// Messages split by the bulk delete ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AgePartition {
    /// Young enough to delete
    pub eligible: Vec<Candidate>,
    /// Number of candidates past the ceiling
    pub too_old: usize,
}

/// What the deleting stage will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionPlan {
    /// Nothing to delete
    Nothing,
    /// Exactly one message, deleted individually
    Single(MessageId),
    /// Two or more messages, one bulk call
    Bulk(Vec<MessageId>),
}

/// Channel operations the purge depends on.
pub trait MessageChannel {
    /// Most recent messages, newest first, at most `limit`.
    fn fetch_recent(&self, limit: u8) -> impl Future<Output = Result<Vec<Candidate>>> + Send;

    /// Deletes one message.
    fn delete_one(&self, id: MessageId) -> impl Future<Output = Result<()>> + Send;

    /// Deletes 2-100 messages in one call, returning how many were removed.
    fn delete_bulk(&self, ids: Vec<MessageId>) -> impl Future<Output = Result<usize>> + Send;
}

/// The `validating` stage.
pub const fn validate(request: &PurgeRequest) -> std::result::Result<(), PurgeAbort> {
    if !request.text_capable {
        return Err(PurgeAbort::NotTextChannel);
    }
    if !request.can_manage_messages {
        return Err(PurgeAbort::MissingPermission);
    }
    Ok(())
}

/// How many messages to ask Discord for.
///
/// Discord's fetch cannot filter by author, so an author filter over-fetches a
/// full batch and narrows it client side.
#[must_use]
pub const fn fetch_limit(request: &PurgeRequest) -> u8 {
    if request.author.is_some() {
        AUTHOR_FILTER_BATCH
    } else {
        request.amount
    }
}

/// Applies the author filter and truncates to the requested amount.
#[must_use]
pub fn select(fetched: Vec<Candidate>, author: Option<UserId>, amount: u8) -> Vec<Candidate> {
    fetched
        .into_iter()
        .filter(|message| author.is_none_or(|author| message.author == author))
        .take(usize::from(amount))
        .collect()
}

/// The `filtering` stage: messages at most 14 days old are eligible.
#[must_use]
pub fn partition_by_age(candidates: Vec<Candidate>, now: DateTime<Utc>) -> AgePartition {
    let (eligible, too_old): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|message| now - message.created_at <= TimeDelta::days(BULK_DELETE_MAX_AGE_DAYS));

    AgePartition {
        eligible,
        too_old: too_old.len(),
    }
}

/// Picks single or bulk deletion for the eligible messages.
#[must_use]
pub fn plan_deletion(eligible: &[Candidate]) -> DeletionPlan {
    match eligible {
        [] => DeletionPlan::Nothing,
        [only] => DeletionPlan::Single(only.id),
        many => DeletionPlan::Bulk(many.iter().map(|message| message.id).collect()),
    }
}

/// Runs `fetching → filtering → deleting` against `channel`.
///
/// Call [`validate`] first; this function assumes the request passed it.
pub async fn execute<C>(channel: &C, request: &PurgeRequest, now: DateTime<Utc>) -> Result<PurgeOutcome>
where
    C: MessageChannel + Sync,
{
    let fetched = channel.fetch_recent(fetch_limit(request)).await?;
    let selected = select(fetched, request.author, request.amount);
    if selected.is_empty() {
        return Ok(PurgeOutcome::Aborted(PurgeAbort::NothingFound));
    }

    let partition = partition_by_age(selected, now);
    let deleted = match plan_deletion(&partition.eligible) {
        DeletionPlan::Nothing => return Ok(PurgeOutcome::Aborted(PurgeAbort::AllTooOld)),
        DeletionPlan::Single(id) => {
            channel.delete_one(id).await?;
            1
        }
        DeletionPlan::Bulk(ids) => channel.delete_bulk(ids).await?,
    };

    Ok(PurgeOutcome::Completed(PurgeReport {
        deleted,
        skipped_too_old: partition.too_old,
    }))
}
