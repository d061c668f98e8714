//! Command descriptors: the static schema of a slash command plus its action.

use crate::{
    bot::{BotData, registry::Named, responder::InteractionResponder},
    errors::{Error, Result},
};
use poise::serenity_prelude::{
    self as serenity, CommandInteraction, GuildId, Permissions, ResolvedOption, ResolvedValue,
    User,
};
use std::{fmt, future::Future, pin::Pin};

/// Boxed, sendable future borrowed for `'a`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The executable half of a descriptor.
pub type CommandAction = for<'a> fn(Invocation<'a>) -> BoxFuture<'a, Result<()>>;

/// Value type of a command option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// A user picked from the member list
    User,
    /// Free text
    String,
    /// Whole number
    Integer,
}

/// One typed option of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionSpec {
    /// Option name as typed by users
    pub name: &'static str,
    /// Shown in the Discord client
    pub description: &'static str,
    /// Value type
    pub kind: OptionKind,
    /// Whether Discord requires a value
    pub required: bool,
    /// Lower bound for integers
    pub min_value: Option<u64>,
    /// Upper bound for integers
    pub max_value: Option<u64>,
}

impl OptionSpec {
    /// Optional option of `kind` without bounds.
    #[must_use]
    pub const fn new(name: &'static str, description: &'static str, kind: OptionKind) -> Self {
        Self {
            name,
            description,
            kind,
            required: false,
            min_value: None,
            max_value: None,
        }
    }

    /// Marks the option as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Inclusive integer bounds.
    #[must_use]
    pub const fn range(mut self, min: u64, max: u64) -> Self {
        self.min_value = Some(min);
        self.max_value = Some(max);
        self
    }
}

/// Schema and action of one slash command.
#[derive(Clone)]
pub struct CommandDescriptor {
    /// Unique command name
    pub name: &'static str,
    /// Shown in the Discord client and in `/help`
    pub description: &'static str,
    /// Options in display order
    pub options: Vec<OptionSpec>,
    /// Default member permission required to see and use the command
    pub required_permission: Option<Permissions>,
    /// What runs when the command is invoked
    pub action: CommandAction,
}

impl CommandDescriptor {
    /// Descriptor without options or permission requirement.
    #[must_use]
    pub const fn new(name: &'static str, description: &'static str, action: CommandAction) -> Self {
        Self {
            name,
            description,
            options: Vec::new(),
            required_permission: None,
            action,
        }
    }

    /// Appends an option.
    #[must_use]
    pub fn option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Requires `permission` by default.
    #[must_use]
    pub const fn permission(mut self, permission: Permissions) -> Self {
        self.required_permission = Some(permission);
        self
    }
}

impl Named for CommandDescriptor {
    fn name(&self) -> &str {
        self.name
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("options", &self.options)
            .field("required_permission", &self.required_permission)
            .finish_non_exhaustive()
    }
}

/// Everything an action gets to work with for one interaction.
#[derive(Clone, Copy)]
pub struct Invocation<'a> {
    /// Gateway context (cache, HTTP)
    pub ctx: &'a serenity::Context,
    /// The slash command interaction
    pub interaction: &'a CommandInteraction,
    /// Shared bot state
    pub data: &'a BotData,
    /// Tracks and sends responses for this interaction
    pub responder: &'a InteractionResponder<'a>,
}

impl<'a> Invocation<'a> {
    /// The invoking user.
    #[must_use]
    pub fn user(&self) -> &'a User {
        &self.interaction.user
    }

    /// Guild the command was used in.
    #[must_use]
    pub fn guild_id(&self) -> Option<GuildId> {
        self.interaction.guild_id
    }

    /// Resolved option values.
    #[must_use]
    pub fn options(&self) -> Vec<ResolvedOption<'a>> {
        self.interaction.data.options()
    }
}

/// String option named `name`.
#[must_use]
pub fn string_option<'a>(options: &[ResolvedOption<'a>], name: &str) -> Option<&'a str> {
    options.iter().find(|o| o.name == name).and_then(|o| match o.value {
        ResolvedValue::String(value) => Some(value),
        _ => None,
    })
}

/// Integer option named `name`.
#[must_use]
pub fn integer_option(options: &[ResolvedOption<'_>], name: &str) -> Option<i64> {
    options.iter().find(|o| o.name == name).and_then(|o| match o.value {
        ResolvedValue::Integer(value) => Some(value),
        _ => None,
    })
}

/// User option named `name`.
#[must_use]
pub fn user_option<'a>(options: &[ResolvedOption<'a>], name: &str) -> Option<&'a User> {
    options.iter().find(|o| o.name == name).and_then(|o| match o.value {
        ResolvedValue::User(user, _) => Some(user),
        _ => None,
    })
}

/// A required option that Discord failed to deliver.
#[must_use]
pub fn missing_option(name: &str) -> Error {
    Error::Validation {
        field: name.to_string(),
        message: "required option is missing".to_string(),
    }
}
