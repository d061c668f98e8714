//! Core logic - framework-agnostic persistence, validation and moderation rules.
//!
//! Nothing in here talks to Discord directly. The bot layer gathers facts from the
//! gateway cache and HTTP API and hands them to these functions.

/// Text helpers for informational replies
pub mod format;
/// Moderation authorization checks
pub mod guard;
/// Guild persistence and settings
pub mod guilds;
/// User-guild membership persistence
pub mod memberships;
/// Bulk message deletion
pub mod purge;
/// User persistence
pub mod users;
/// Input and configuration validators
pub mod validation;
