//! Special commands parser for interactive chat
//!
//! Special commands change the session (category, reactions, clearing,
//! ending) or show information instead of being sent to the assistant.
//! Commands are prefixed with `/` and are case-insensitive.

use crate::category::ChatCategory;
use crate::session::Reaction;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an unsupported argument
    #[error("Unsupported argument for {command}: {arg}\n\nType '/help' to see valid usage")]
    UnsupportedArgument { command: String, arg: String },

    /// Command requires an argument but none was provided
    #[error("Command {command} requires an argument\n\nUsage: {usage}")]
    MissingArgument { command: String, usage: String },
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Switch the category used by future messages
    SwitchCategory(ChatCategory),

    /// List categories
    ListCategories,

    /// React to the message at this 1-based position in the log
    React {
        /// 1-based index as shown by `/history`
        index: usize,
        /// Reaction tag
        reaction: Reaction,
    },

    /// Reprint the conversation
    ShowHistory,

    /// Show provider, category, and message counts
    ShowStatus,

    /// Show the submitted profile
    ShowProfile,

    /// Clear the conversation but keep the session
    Clear,

    /// End the session and return to profile intake
    EndSession,

    /// Display help information
    Help,

    /// Exit the program
    Exit,

    /// Not a special command, send to the assistant
    None,
}

const REACT_USAGE: &str = "/react <message number> <up|down>";

/// Parse a line of chat input
///
/// # Errors
///
/// Returns `CommandError` for unknown commands or bad arguments
///
/// # Examples
///
/// ```
/// use healthchat::category::ChatCategory;
/// use healthchat::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// let cmd = parse_special_command("/category sleep").unwrap();
/// assert_eq!(cmd, SpecialCommand::SwitchCategory(ChatCategory::Sleep));
///
/// let cmd = parse_special_command("Is honey safe?").unwrap();
/// assert_eq!(cmd, SpecialCommand::None);
///
/// assert!(parse_special_command("/foo").is_err());
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let mut parts = lower.split_whitespace();
    let command = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match command {
        "/category" | "/cat" => {
            if args.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "/category".to_string(),
                    usage: "/category <name>".to_string(),
                });
            }
            let name = args.join(" ");
            ChatCategory::parse_str(&name)
                .map(SpecialCommand::SwitchCategory)
                .map_err(|_| CommandError::UnsupportedArgument {
                    command: "/category".to_string(),
                    arg: name,
                })
        }
        "/categories" => Ok(SpecialCommand::ListCategories),

        "/react" => parse_react(&args),

        "/history" => Ok(SpecialCommand::ShowHistory),
        "/status" => Ok(SpecialCommand::ShowStatus),
        "/profile" => Ok(SpecialCommand::ShowProfile),
        "/clear" => Ok(SpecialCommand::Clear),
        "/end" => Ok(SpecialCommand::EndSession),
        "/help" | "/?" => Ok(SpecialCommand::Help),

        "exit" | "quit" | "/exit" | "/quit" => Ok(SpecialCommand::Exit),

        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

fn parse_react(args: &[&str]) -> Result<SpecialCommand, CommandError> {
    let (index, tag) = match args {
        [index, tag] => (index, tag),
        [] | [_] => {
            return Err(CommandError::MissingArgument {
                command: "/react".to_string(),
                usage: REACT_USAGE.to_string(),
            })
        }
        _ => {
            return Err(CommandError::UnsupportedArgument {
                command: "/react".to_string(),
                arg: args[2..].join(" "),
            })
        }
    };

    let index = index
        .parse::<usize>()
        .ok()
        .filter(|i| *i > 0)
        .ok_or_else(|| CommandError::UnsupportedArgument {
            command: "/react".to_string(),
            arg: index.to_string(),
        })?;

    let reaction = Reaction::parse_str(tag).map_err(|_| CommandError::UnsupportedArgument {
        command: "/react".to_string(),
        arg: tag.to_string(),
    })?;

    Ok(SpecialCommand::React { index, reaction })
}

/// Display help text for special commands
pub fn print_help() {
    println!(
        r#"
Special Commands for HealthChat
===============================

TOPIC:
  /category <name>  - Switch topic for future messages
  /categories       - List available topics

CONVERSATION:
  /history          - Show the conversation with message numbers
  /react <n> <tag>  - React to message n (up, down, helpful, not_helpful)
  /clear            - Clear the conversation, keep the profile

SESSION:
  /status           - Show provider, topic, and message count
  /profile          - Show the submitted health profile
  /end              - End the chat and start over with a new profile
  /help             - Show this help message
  /exit             - Exit HealthChat (also: exit, quit)

NOTES:
  - Commands are case-insensitive
  - Anything not starting with / is sent to the assistant
"#
    );
}
