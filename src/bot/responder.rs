//! Interaction responses with reply tracking.
//!
//! Discord accepts exactly one initial response per interaction (a reply or a
//! deferral). Everything after that must edit the response or add follow-ups. The
//! responder records which of the two happened so the dispatcher can pick the right
//! call when a command fails halfway.

use crate::{bot::dispatch::Responder, errors::Result};
use poise::serenity_prelude::{
    CommandInteraction, CreateEmbed, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, EditInteractionResponse, Http, Message,
};
use std::sync::atomic::{AtomicBool, Ordering};

/// Sends responses for one slash command interaction.
pub struct InteractionResponder<'a> {
    http: &'a Http,
    interaction: &'a CommandInteraction,
    replied: AtomicBool,
    deferred: AtomicBool,
}

impl<'a> InteractionResponder<'a> {
    /// Responder for an interaction that has not been answered yet.
    #[must_use]
    pub const fn new(http: &'a Http, interaction: &'a CommandInteraction) -> Self {
        Self {
            http,
            interaction,
            replied: AtomicBool::new(false),
            deferred: AtomicBool::new(false),
        }
    }

    /// Sends the initial response.
    pub async fn send(&self, message: CreateInteractionResponseMessage) -> Result<()> {
        self.interaction
            .create_response(self.http, CreateInteractionResponse::Message(message))
            .await?;
        self.replied.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Initial response visible only to the invoking user.
    pub async fn reply_ephemeral(&self, content: impl Into<String>) -> Result<()> {
        self.send(
            CreateInteractionResponseMessage::new()
                .content(content)
                .ephemeral(true),
        )
        .await
    }

    /// Initial response with a single public embed.
    pub async fn reply_embed(&self, embed: CreateEmbed) -> Result<()> {
        self.send(CreateInteractionResponseMessage::new().embed(embed))
            .await
    }

    /// Acknowledges the interaction with an ephemeral "thinking" state.
    pub async fn defer_ephemeral(&self) -> Result<()> {
        self.interaction.defer_ephemeral(self.http).await?;
        self.deferred.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Edits the initial (or deferred) response.
    pub async fn edit(&self, edit: EditInteractionResponse) -> Result<Message> {
        Ok(self.interaction.edit_response(self.http, edit).await?)
    }

    /// The message created by the initial response.
    pub async fn original_response(&self) -> Result<Message> {
        Ok(self.interaction.get_response(self.http).await?)
    }

    /// Ephemeral follow-up message.
    pub async fn follow_up_ephemeral(&self, content: impl Into<String>) -> Result<Message> {
        Ok(self
            .interaction
            .create_followup(
                self.http,
                CreateInteractionResponseFollowup::new()
                    .content(content)
                    .ephemeral(true),
            )
            .await?)
    }

    /// Whether the initial response was a reply.
    #[must_use]
    pub fn replied(&self) -> bool {
        self.replied.load(Ordering::SeqCst)
    }

    /// Whether the initial response was a deferral.
    #[must_use]
    pub fn deferred(&self) -> bool {
        self.deferred.load(Ordering::SeqCst)
    }
}

impl Responder for InteractionResponder<'_> {
    async fn reply(&self, content: &str) -> Result<()> {
        self.reply_ephemeral(content).await
    }

    async fn follow_up(&self, content: &str) -> Result<()> {
        self.follow_up_ephemeral(content).await.map(|_| ())
    }

    fn is_acknowledged(&self) -> bool {
        self.replied() || self.deferred()
    }
}
