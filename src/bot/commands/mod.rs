//! Slash command implementations organized by category.

/// Informational commands: ping, info, help, userinfo, serverinfo
pub mod general;

/// Moderation commands: kick, ban, clear
pub mod moderation;

use crate::bot::command::CommandDescriptor;

/// Every command the bot ships with, in help order.
#[must_use]
pub fn all() -> Vec<CommandDescriptor> {
    vec![
        general::ping(),
        general::info(),
        general::help(),
        general::userinfo(),
        general::serverinfo(),
        moderation::kick(),
        moderation::ban(),
        moderation::clear(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::registry::{Category, CommandRegistry};
    use std::collections::HashSet;

    #[test]
    fn test_command_names_are_unique() {
        let commands = all();
        let names: HashSet<&str> = commands.iter().map(|c| c.name).collect();
        assert_eq!(names.len(), commands.len());
    }

    #[test]
    fn test_moderation_commands_require_permissions() {
        for command in all() {
            let moderation = Category::of(command.name) == Category::Moderation;
            assert_eq!(
                command.required_permission.is_some(),
                moderation,
                "{}",
                command.name
            );
        }
    }

    #[test]
    fn test_registry_keeps_help_order() {
        let registry: CommandRegistry<CommandDescriptor> = all().into_iter().collect();
        assert_eq!(
            registry.names().collect::<Vec<_>>(),
            vec!["ping", "info", "help", "userinfo", "serverinfo", "kick", "ban", "clear"]
        );
    }
}
