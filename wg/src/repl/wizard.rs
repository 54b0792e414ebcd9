//! Interactive trip wizard

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use super::render;
use crate::api::{INTEREST_OPTIONS, TravelStyle};
use crate::wizard::{TripWizard, WizardStep};

/// Outcome of one prompt
enum Answer {
    Text(String),
    Cancel,
}

/// Drives a [`TripWizard`] from terminal prompts
pub struct WizardPrompter {
    rl: DefaultEditor,
}

impl WizardPrompter {
    pub fn new() -> Result<Self> {
        let rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;
        Ok(Self { rl })
    }

    fn ask(&mut self, label: &str, initial: &str) -> Result<Answer> {
        match self.rl.readline_with_initial(&format!("{} ", label.bright_green()), (initial, "")) {
            Ok(line) => Ok(Answer::Text(line.trim().to_string())),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!();
                Ok(Answer::Cancel)
            }
            Err(err) => Err(eyre::eyre!("Readline error: {}", err)),
        }
    }

    /// Walk the wizard until results are ready
    ///
    /// Returns false when the user quits first.
    pub async fn run(&mut self, wizard: &mut TripWizard) -> Result<bool> {
        println!();
        println!("{}", "WanderGuide Trip Planner".bright_cyan().bold());
        println!("Press {} at any prompt to quit", "Ctrl+D".yellow());

        loop {
            debug!(step = wizard.step().number(), "WizardPrompter::run: step");
            println!();
            println!(
                "{} {}",
                format!("[{}/4]", wizard.step().number()).dimmed(),
                wizard.step().title().bright_cyan().bold()
            );

            let keep_going = match wizard.step() {
                WizardStep::Destination => self.destination_step(wizard)?,
                WizardStep::Preferences => self.preferences_step(wizard)?,
                WizardStep::Review => self.review_step(wizard).await?,
                WizardStep::Results => return Ok(true),
            };
            if !keep_going {
                return Ok(false);
            }
        }
    }

    fn destination_step(&mut self, wizard: &mut TripWizard) -> Result<bool> {
        let trip = wizard.trip().clone();
        let fields: [(&str, &str); 4] = [
            ("From:", &trip.origin),
            ("To:", &trip.destination),
            ("Departure (YYYY-MM-DD):", &trip.departure_date),
            ("Return (YYYY-MM-DD):", &trip.return_date),
        ];

        let mut answers = Vec::with_capacity(fields.len());
        for (label, initial) in fields {
            match self.ask(label, initial)? {
                Answer::Text(text) => answers.push(text),
                Answer::Cancel => return Ok(false),
            }
        }

        let mut answers = answers.into_iter();
        wizard.set_origin(answers.next().unwrap_or_default());
        wizard.set_destination(answers.next().unwrap_or_default());
        wizard.set_departure_date(answers.next().unwrap_or_default());
        wizard.set_return_date(answers.next().unwrap_or_default());

        // A refused advance has already been reported; the step is asked again
        let _ = wizard.advance();
        Ok(true)
    }

    fn preferences_step(&mut self, wizard: &mut TripWizard) -> Result<bool> {
        let trip = wizard.trip().clone();

        let Answer::Text(travelers) = self.ask("Travelers:", &trip.travelers.to_string())? else {
            return Ok(false);
        };
        match travelers.parse::<u32>() {
            Ok(n) => wizard.set_travelers(n),
            Err(_) => println!("{} keeping {} travelers", "?".yellow(), trip.travelers),
        }

        let Answer::Text(budget) = self.ask("Budget (USD):", &format!("{:.0}", trip.budget))? else {
            return Ok(false);
        };
        match budget.trim_start_matches('$').replace(',', "").parse::<f64>() {
            Ok(amount) => wizard.set_budget(amount),
            Err(_) => println!("{} keeping a budget of ${:.0}", "?".yellow(), trip.budget),
        }

        println!("{}", "Interests (numbers separated by commas, blank for none):".dimmed());
        for (index, option) in INTEREST_OPTIONS.iter().enumerate() {
            let mark = if trip.interests.contains(*option) { "x" } else { " " };
            println!("  [{}] {}. {}", mark, index + 1, option);
        }
        let selected: Vec<String> = INTEREST_OPTIONS
            .iter()
            .enumerate()
            .filter(|(_, o)| trip.interests.contains(**o))
            .map(|(i, _)| (i + 1).to_string())
            .collect();
        let Answer::Text(interests) = self.ask("Interests:", &selected.join(","))? else {
            return Ok(false);
        };
        let chosen: Vec<&str> = interests
            .split(',')
            .filter_map(|n| n.trim().parse::<usize>().ok())
            .filter_map(|n| n.checked_sub(1).and_then(|i| INTEREST_OPTIONS.get(i)).copied())
            .collect();
        for option in INTEREST_OPTIONS {
            if trip.interests.contains(option) != chosen.contains(&option) {
                wizard.toggle_interest(option);
            }
        }

        let styles: Vec<String> = TravelStyle::ALL.iter().map(|s| s.to_string()).collect();
        println!("{} {}", "Styles:".dimmed(), styles.join(", "));
        let Answer::Text(style) = self.ask("Travel style:", &trip.travel_style.to_string())? else {
            return Ok(false);
        };
        match style.parse::<TravelStyle>() {
            Ok(style) => wizard.set_travel_style(style),
            Err(e) => println!("{} {}", "?".yellow(), e),
        }

        let _ = wizard.advance();
        Ok(true)
    }

    async fn review_step(&mut self, wizard: &mut TripWizard) -> Result<bool> {
        render::print_trip_summary(wizard.trip());
        println!();

        let Answer::Text(choice) = self.ask("[s]ubmit, [b]ack or [q]uit:", "s")? else {
            return Ok(false);
        };
        match choice.to_lowercase().as_str() {
            "s" | "submit" | "" => {
                println!("{}", "Planning your trip...".dimmed());
                // Failures are reported by the notifier and leave the wizard on review
                let _ = wizard.submit().await;
                Ok(true)
            }
            "b" | "back" => {
                wizard.retreat();
                Ok(true)
            }
            "q" | "quit" => Ok(false),
            other => {
                println!("{} Unknown choice: {}", "?".yellow(), other);
                Ok(true)
            }
        }
    }
}
