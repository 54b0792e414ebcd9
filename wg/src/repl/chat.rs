//! Trip assistant REPL

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use super::render;
use crate::api::Role;
use crate::chat::{ChatSession, SendOutcome};

/// Interactive conversation with the trip assistant
pub struct ChatRepl {
    session: ChatSession,
}

enum SlashResult {
    Continue,
    Quit,
}

impl ChatRepl {
    pub fn new(session: ChatSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Run the REPL main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input) {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    } else {
                        self.send(input).await;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "WanderGuide Trip Assistant".bright_cyan().bold());
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
        if let Some(greeting) = self.session.messages().first() {
            println!("{} {}", "Assistant:".bright_blue().bold(), greeting.content);
        }
        self.print_suggestions();
    }

    fn print_suggestions(&self) {
        let suggestions = self.session.suggested_questions();
        if suggestions.is_empty() {
            return;
        }
        println!();
        println!("{}", "Try asking:".dimmed());
        for question in suggestions {
            println!("  {} {}", "•".dimmed(), question);
        }
        println!();
    }

    fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");
        debug!(%cmd, "ChatRepl::handle_slash_command: called");

        match cmd {
            "/help" | "/h" => {
                self.print_help();
                SlashResult::Continue
            }
            "/quit" | "/q" | "/exit" => SlashResult::Quit,
            "/itinerary" | "/i" => {
                match self.session.itinerary().current() {
                    Some(itinerary) => render::print_itinerary(&itinerary),
                    None => println!("{}", "No itinerary yet. Run `wg plan` to create one.".dimmed()),
                }
                println!();
                SlashResult::Continue
            }
            "/history" => {
                self.print_history();
                SlashResult::Continue
            }
            "/suggest" => {
                self.print_suggestions();
                SlashResult::Continue
            }
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
                SlashResult::Continue
            }
        }
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:14} Show this help", "/help".yellow());
        println!("  {:14} Exit the assistant", "/quit".yellow());
        println!("  {:14} Show the current itinerary", "/itinerary".yellow());
        println!("  {:14} Show the conversation so far", "/history".yellow());
        println!("  {:14} Show starter questions", "/suggest".yellow());
        println!();
    }

    fn print_history(&self) {
        println!();
        println!("{}", "Conversation History:".bright_cyan());
        for (i, msg) in self.session.messages().iter().enumerate() {
            let role = match msg.role {
                Role::User => "You".bright_green(),
                Role::Assistant => "Assistant".bright_blue(),
            };
            let preview: String = msg.content.chars().take(60).collect();
            let preview = if msg.content.chars().count() > 60 {
                format!("{}...", preview)
            } else {
                preview
            };
            let updated = if msg.itinerary_update.is_some() { " [itinerary updated]" } else { "" };
            println!(
                "  {}. {} {}: {}{}",
                i + 1,
                msg.timestamp.format("%H:%M").to_string().dimmed(),
                role,
                preview.replace('\n', " "),
                updated.bright_green()
            );
        }
        println!();
    }

    async fn send(&self, input: &str) {
        println!("{}", "Thinking...".dimmed());
        let outcome = self.session.send_message(input).await;
        debug!(?outcome, "ChatRepl::send: outcome");

        if matches!(outcome, SendOutcome::Ignored) {
            return;
        }
        if let Some(reply) = self.session.messages().last() {
            println!("{} {}", "Assistant:".bright_blue().bold(), reply.content);
        }
        if let SendOutcome::Replied {
            itinerary_updated: true,
        } = outcome
        {
            println!(
                "{}",
                "Your itinerary was updated. Type /itinerary to see it.".bright_green()
            );
        }
        println!();
    }
}
