//! WanderGuide - trip planner and travel assistant
//!
//! CLI entry point for planning trips, running lookups and chatting with the
//! trip assistant.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, FromArgMatches};
use colored::Colorize;
use eyre::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use wanderguide::api::{
    ActivityPreferences, ApiError, DEFAULT_FORECAST_DAYS, FlightSearch, HotelSearch, RestaurantQuery, TravelApi,
    create_gateway,
};
use wanderguide::cli::{Cli, Command, OutputFormat, TokenCommand, generate_after_help};
use wanderguide::config::Config;
use wanderguide::notify::{Notice, Notifier};
use wanderguide::persist::{self, LiveItinerary};
use wanderguide::repl::{self, TerminalNotifier, WizardPrompter, render};
use wanderguide::store::{AUTH_TOKEN_KEY, ITINERARY_KEY, JsonFileStore, KeyValueStore};
use wanderguide::wizard::{FlightSort, HotelSort, TripWizard, filter_hotels_by_stars, sort_flights, sort_hotels};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wanderguide")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("wanderguide.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Cli::command().after_help(generate_after_help());
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref()).context("Failed to setup logging")?;
    info!(base_url = %config.api.base_url, "WanderGuide loaded config");

    let store: Arc<dyn KeyValueStore> =
        Arc::new(JsonFileStore::open(&config.storage.path).context("Failed to open local store")?);

    debug!(command = ?cli.command, "main: dispatching command");
    let Some(command) = cli.command else {
        Cli::command().after_help(generate_after_help()).print_help()?;
        return Ok(());
    };

    match command {
        Command::Token { command } => cmd_token(store.as_ref(), command),
        Command::Show { format } => cmd_show(store.as_ref(), format),
        command => {
            let api = create_gateway(&config.api, Some(store.clone())).context("Failed to create API gateway")?;
            let notifier = TerminalNotifier;
            match command {
                Command::Plan {
                    chat,
                    flight_sort,
                    hotel_sort,
                    stars,
                    format,
                } => cmd_plan(&config, api, store, chat, (flight_sort, hotel_sort, stars), format).await,
                Command::Chat => cmd_chat(&config, api, store).await,
                Command::Flights {
                    origin,
                    destination,
                    depart,
                    return_date,
                    passengers,
                    sort,
                    format,
                } => {
                    let search = FlightSearch {
                        origin,
                        destination,
                        departure_date: depart,
                        return_date,
                        passengers,
                    };
                    let flights = lookup(&notifier, "Flight Search Failed", api.search_flights(&search).await)?;
                    let view = sort_flights(&flights, sort);
                    emit(format, &view, || render::print_flights(&view, sort))
                }
                Command::Hotels {
                    destination,
                    check_in,
                    check_out,
                    guests,
                    rooms,
                    sort,
                    stars,
                    format,
                } => {
                    let search = HotelSearch {
                        destination,
                        check_in,
                        check_out,
                        guests,
                        rooms,
                    };
                    let hotels = lookup(&notifier, "Hotel Search Failed", api.search_hotels(&search).await)?;
                    let sorted = sort_hotels(&hotels, sort);
                    let view = filter_hotels_by_stars(&sorted, stars);
                    emit(format, &view, || render::print_hotels(&view, sort, stars))
                }
                Command::Activities {
                    destination,
                    interests,
                    weather,
                    format,
                } => {
                    if interests.is_empty() {
                        let activities =
                            lookup(&notifier, "Activity Search Failed", api.search_activities(&destination).await)?;
                        emit(format, &activities, || render::print_activities(&activities))
                    } else {
                        let preferences = ActivityPreferences {
                            location: destination,
                            preferences: interests,
                            weather,
                        };
                        let suggestions = lookup(
                            &notifier,
                            "Recommendations Failed",
                            api.activity_recommendations(&preferences).await,
                        )?;
                        emit(format, &suggestions, || {
                            render::print_recommendations("Suggested Activities", &suggestions)
                        })
                    }
                }
                Command::Restaurants {
                    location,
                    cuisine,
                    budget,
                    format,
                } => {
                    let query = RestaurantQuery {
                        location,
                        cuisine,
                        budget,
                    };
                    let restaurants = lookup(&notifier, "Recommendations Failed", api.restaurants(&query).await)?;
                    emit(format, &restaurants, || {
                        render::print_recommendations("Restaurants", &restaurants)
                    })
                }
                Command::Weather {
                    destination,
                    days,
                    format,
                } => {
                    let days = days.unwrap_or(DEFAULT_FORECAST_DAYS);
                    let forecast =
                        lookup(&notifier, "Forecast Failed", api.weather_forecast(&destination, days).await)?;
                    emit(format, &forecast, || render::print_forecast(&destination, &forecast))
                }
                Command::Insights { destination, format } => {
                    let insights =
                        lookup(&notifier, "Insights Failed", api.cultural_insights(&destination).await)?;
                    emit(format, &insights, || render::print_insights(&insights))
                }
                Command::Optimize { target, format } => cmd_optimize(api, store, &notifier, target, format).await,
                Command::Health => cmd_health(api, &notifier).await,
                Command::Token { .. } | Command::Show { .. } => Ok(()),
            }
        }
    }
}

/// Report a failed lookup through the notifier and turn it into an exit error
fn lookup<T>(notifier: &dyn Notifier, failure_title: &str, result: Result<T, ApiError>) -> Result<T> {
    result.map_err(|err| {
        notifier.notify(Notice::from_api_error(&err, failure_title));
        eyre::eyre!("{} ({})", failure_title, err.category())
    })
}

/// Print `value` as JSON or through `render`
fn emit<T: Serialize + ?Sized>(format: OutputFormat, value: &T, render: impl FnOnce()) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value).context("Failed to encode output")?);
        }
        OutputFormat::Text => {
            render();
            println!();
        }
    }
    Ok(())
}

async fn cmd_plan(
    config: &Config,
    api: Arc<dyn TravelApi>,
    store: Arc<dyn KeyValueStore>,
    chat: bool,
    view: (FlightSort, HotelSort, u8),
    format: OutputFormat,
) -> Result<()> {
    debug!(chat, %format, "cmd_plan: called");
    let notifier: Arc<dyn Notifier> = Arc::new(TerminalNotifier);
    let mut wizard = TripWizard::new(api.clone(), notifier, config.wizard.clone());

    let mut prompter = WizardPrompter::new()?;
    if !prompter.run(&mut wizard).await? {
        println!("Planning cancelled.");
        return Ok(());
    }
    let Some(results) = wizard.results() else {
        return Ok(());
    };

    persist::save_plan(store.as_ref(), wizard.trip(), results.itinerary()).context("Failed to save trip plan")?;

    let (flight_sort, hotel_sort, stars) = view;
    emit(format, results, || render::print_results(results, flight_sort, hotel_sort, stars))?;

    if chat {
        let live = LiveItinerary::new(Some(results.itinerary().clone()));
        let persister = persist::spawn_itinerary_persister(&live, store.clone());
        let latest = repl::run_chat(api, Some(wizard.trip().clone()), live, &config.chat).await?;
        if let Some(itinerary) = latest {
            wizard.replace_itinerary(itinerary);
        }
        persister.await.context("Itinerary persister failed")?;
    }

    Ok(())
}

async fn cmd_chat(config: &Config, api: Arc<dyn TravelApi>, store: Arc<dyn KeyValueStore>) -> Result<()> {
    debug!("cmd_chat: called");
    let (trip, itinerary) = persist::load_plan(store.as_ref());
    if itinerary.is_none() {
        println!(
            "{}",
            "No saved trip plan. Run `wg plan` first for itinerary-aware answers.".dimmed()
        );
    }

    let live = LiveItinerary::new(itinerary);
    let persister = persist::spawn_itinerary_persister(&live, store);
    repl::run_chat(api, trip, live, &config.chat).await?;
    persister.await.context("Itinerary persister failed")?;
    Ok(())
}

fn cmd_show(store: &dyn KeyValueStore, format: OutputFormat) -> Result<()> {
    debug!(%format, "cmd_show: called");
    let (trip, itinerary) = persist::load_plan(store);
    let Some(itinerary) = itinerary else {
        println!("No saved trip plan. Run `wg plan` to create one.");
        return Ok(());
    };
    emit(format, &itinerary, || {
        if let Some(trip) = &trip {
            render::print_trip_summary(trip);
        }
        render::print_itinerary(&itinerary);
    })
}

async fn cmd_optimize(
    api: Arc<dyn TravelApi>,
    store: Arc<dyn KeyValueStore>,
    notifier: &dyn Notifier,
    target: f64,
    format: OutputFormat,
) -> Result<()> {
    debug!(target, "cmd_optimize: called");
    let (_, itinerary) = persist::load_plan(store.as_ref());
    let Some(itinerary) = itinerary else {
        return Err(eyre::eyre!("No saved itinerary to optimize. Run `wg plan` first."));
    };

    let report = lookup(notifier, "Optimization Failed", api.optimize_budget(&itinerary, target).await)?;
    if let Some(revised) = &report.itinerary {
        wanderguide::store::save(store.as_ref(), ITINERARY_KEY, revised).context("Failed to save revised itinerary")?;
    }
    emit(format, &report, || render::print_optimization(&report))
}

async fn cmd_health(api: Arc<dyn TravelApi>, notifier: &dyn Notifier) -> Result<()> {
    debug!("cmd_health: called");
    let status = lookup(notifier, "Health Check Failed", api.health_check().await)?;
    if status.is_healthy() {
        notifier.notify(Notice::success("Backend healthy", status.message.clone()));
        Ok(())
    } else {
        notifier.notify(Notice::info(format!("Backend status: {}", status.status), status.message.clone()));
        Err(eyre::eyre!("Backend reported status {}", status.status))
    }
}

fn cmd_token(store: &dyn KeyValueStore, command: TokenCommand) -> Result<()> {
    match command {
        TokenCommand::Set { token } => {
            let token = token.trim();
            if token.is_empty() {
                return Err(eyre::eyre!("Token must not be empty"));
            }
            store.set(AUTH_TOKEN_KEY, serde_json::Value::String(token.to_string()))?;
            println!("Token saved.");
        }
        TokenCommand::Clear => {
            store.remove(AUTH_TOKEN_KEY)?;
            println!("Token cleared.");
        }
    }
    Ok(())
}
