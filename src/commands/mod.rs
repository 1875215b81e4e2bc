/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint:

- `chat`        - Profile intake followed by the interactive chat loop
- `categories`  - Category listing

The handlers stay thin: session behavior lives in [`crate::session`].
*/

use crate::config::Config;
use crate::error::Result;
use crate::profile::{HealthProfile, ProfileField};
use crate::providers::create_provider;
use crate::session::{ChatController, SendOutcome, SessionGate};
use std::path::PathBuf;

// Category listing
pub mod categories;

// Profile intake prompts
pub mod intake;

// Special commands parser
pub mod special_commands;

// Chat command handler
pub mod chat {
    //! Interactive chat handler.
    //!
    //! Creates the provider and a [`SessionGate`], runs profile intake, then a
    //! readline-based loop that sends user input through the
    //! [`ChatController`]. `/end` returns to intake with an empty profile.

    use super::*;
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// How the chat loop was left
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum LoopExit {
        EndSession,
        Quit,
    }

    /// Start interactive chat
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `profile_path` - Optional YAML file that pre-fills the first intake
    ///
    /// # Errors
    ///
    /// Returns error if the provider cannot be created, the profile file
    /// cannot be loaded, or the terminal cannot be read
    pub async fn run_chat(config: Config, profile_path: Option<PathBuf>) -> Result<()> {
        tracing::info!("Starting interactive chat");

        let provider = create_provider(&config.provider.provider_type, &config.provider)?;
        let mut gate = SessionGate::new(provider, config.chat.clone());
        let mut preset = profile_path.map(HealthProfile::from_file).transpose()?;

        let mut rl = DefaultEditor::new()?;

        loop {
            let prefilled = match preset.take() {
                Some(profile) => {
                    gate.load_profile(profile)?;
                    true
                }
                None => false,
            };

            if !intake::run_intake(&mut rl, &mut gate, prefilled)? {
                break;
            }

            let controller = gate.submit_profile()?.clone();
            print_welcome_banner(&controller);

            let exit = chat_loop(&mut rl, &controller).await?;
            gate.end_session();

            match exit {
                LoopExit::EndSession => {
                    println!("{}\n", "Session ended. Starting a new profile.".yellow());
                }
                LoopExit::Quit => break,
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    async fn chat_loop(rl: &mut DefaultEditor, controller: &ChatController) -> Result<LoopExit> {
        loop {
            let prompt = format!("{} >> ", controller.category().colored_tag());
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    match parse_special_command(trimmed) {
                        Ok(SpecialCommand::None) => {}
                        Ok(SpecialCommand::Exit) => return Ok(LoopExit::Quit),
                        Ok(SpecialCommand::EndSession) => return Ok(LoopExit::EndSession),
                        Ok(command) => {
                            handle_command(controller, command);
                            continue;
                        }
                        Err(e) => {
                            println!("{}\n", e.to_string().yellow());
                            continue;
                        }
                    }

                    rl.add_history_entry(trimmed)?;
                    send_and_render(controller, trimmed).await;
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    return Ok(LoopExit::Quit);
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    return Ok(LoopExit::Quit);
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    return Ok(LoopExit::Quit);
                }
            }
        }
    }

    /// Send one message, showing a thinking line while it is pending
    async fn send_and_render(controller: &ChatController, text: &str) {
        let mut updates = controller.subscribe();
        let send = controller.send_message(text);
        tokio::pin!(send);

        let result = loop {
            tokio::select! {
                result = &mut send => break result,
                changed = updates.changed() => {
                    if changed.is_err() {
                        break (&mut send).await;
                    }
                    if updates.borrow_and_update().is_loading {
                        println!("{}", "Assistant is thinking...".dimmed());
                    }
                }
            }
        };

        match result {
            Ok(SendOutcome::Replied(id)) => {
                if let Some(reply) = controller.messages().iter().find(|m| m.id == id) {
                    println!("\n{}\n", reply.render());
                }
            }
            Ok(SendOutcome::Failed(failure)) => print_error_banner(&failure.to_string()),
            Ok(SendOutcome::Discarded) => {}
            Err(e) => println!("{}\n", e.to_string().yellow()),
        }
    }

    fn handle_command(controller: &ChatController, command: SpecialCommand) {
        match command {
            SpecialCommand::SwitchCategory(category) => {
                controller.set_category(category);
                println!(
                    "Switched to {} ({})\n",
                    category.colored_tag(),
                    category.description()
                );
            }
            SpecialCommand::ListCategories => {
                categories::categories_table(Some(controller.category())).printstd();
                println!();
            }
            SpecialCommand::React { index, reaction } => {
                match controller.messages().get(index - 1) {
                    Some(message) if controller.react(message.id, reaction) => {
                        println!("Marked message {} as {}\n", index, reaction);
                    }
                    _ => println!(
                        "{}\n",
                        format!("No message number {}. Use /history to list them.", index)
                            .yellow()
                    ),
                }
            }
            SpecialCommand::ShowHistory => print_history(controller),
            SpecialCommand::ShowStatus => print_status_display(controller),
            SpecialCommand::ShowProfile => print_profile(controller.profile()),
            SpecialCommand::Clear => {
                controller.clear();
                println!("Conversation cleared.\n");
            }
            SpecialCommand::Help => print_help(),
            SpecialCommand::EndSession | SpecialCommand::Exit | SpecialCommand::None => {}
        }
    }

    fn print_welcome_banner(controller: &ChatController) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║              HealthChat Interactive Chat - Welcome!          ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Hello {}!", controller.profile().name.bold());
        println!(
            "Topic: {} ({})\n",
            controller.category().colored_tag(),
            controller.category().description()
        );
        println!("Type '/help' for available commands, '/end' to start over, 'exit' to quit\n");
    }

    fn print_error_banner(message: &str) {
        println!("\n{}\n", format!(" ! {} ", message).white().on_red());
    }

    fn print_history(controller: &ChatController) {
        let messages = controller.messages();
        if messages.is_empty() {
            println!("{}\n", "No messages yet.".yellow());
            return;
        }
        for (i, message) in messages.iter().enumerate() {
            println!("{:>3}. {}", i + 1, message.render());
        }
        println!();
    }

    fn print_status_display(controller: &ChatController) {
        let snapshot = controller.snapshot();
        let reactions = snapshot
            .messages
            .iter()
            .filter(|m| m.reaction.is_some())
            .count();

        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    HealthChat Session Status                 ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Provider:          {}", controller.provider_name());
        println!(
            "Topic:             {} ({})",
            snapshot.category.colored_tag(),
            snapshot.category.description()
        );
        println!("Conversation Size: {} messages", snapshot.messages.len());
        println!("Reactions:         {}", reactions);
        match &snapshot.error {
            Some(failure) => println!("Last Error:        {}", failure.to_string().red()),
            None => println!("Last Error:        none"),
        }
        println!();
    }

    fn print_profile(profile: &HealthProfile) {
        println!();
        for field in ProfileField::ALL {
            let value = profile.get(field);
            let value = if value.is_empty() { "-" } else { value };
            println!("{:<40} {}", field.label(), value);
        }
        println!();
    }
}
