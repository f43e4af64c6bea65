//! Cyclefit CLI
//!
//! Command-line front end for the Cyclefit client core:
//! - Sign in and out
//! - Raw GET/POST against the API
//! - Preview a training schedule
//! - Browse cycles, the feed and daily duties

use anyhow::{bail, Context};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cyclefit::api::CycleApi;
use cyclefit::client::{auth, ApiError, RequestClient};
use cyclefit::config::{generate_default_config, Config, LoggingConfig};
use cyclefit::schedule::{month_load, parse_date, project, CyclePlan, SchedulePreviewEntry};
use cyclefit::session::SessionStore;

#[derive(Parser)]
#[command(name = "cyclefit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Workout cycles, schedules and social feed from the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL, overrides the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and remember the login
    Login {
        username: String,
        #[arg(long, env = "CYCLEFIT_PASSWORD")]
        password: String,
    },

    /// Create an account and remember the login
    Register {
        username: String,
        #[arg(long, env = "CYCLEFIT_PASSWORD")]
        password: String,
    },

    /// Forget the stored login
    Logout,

    /// Show the signed-in user
    Whoami,

    /// GET a raw API path
    Get { path: String },

    /// POST a raw API path
    Post {
        path: String,
        /// JSON body
        #[arg(short, long, default_value = "{}")]
        body: String,
        /// Merge the stored login into the body
        #[arg(long)]
        auth: bool,
    },

    /// Preview the schedule of a new cycle
    Preview {
        /// Start date (YYYY-MM-DD, default: today)
        #[arg(short, long)]
        start: Option<String>,
        /// Training days per period
        #[arg(short, long, default_value = "3")]
        training: u32,
        /// Rest days per period
        #[arg(short, long, default_value = "0")]
        rest: u32,
        /// Days to preview (default: from config)
        #[arg(long)]
        horizon: Option<u32>,
    },

    /// Training load per day of a month
    Month {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
        /// Plans as START:TRAINING:REST (default: your cycles)
        #[arg(short, long)]
        plan: Vec<String>,
    },

    /// Your cycles
    Cycles,

    /// Public cycles from people you follow
    Feed,

    /// Duties of a day
    Day {
        /// Date (YYYY-MM-DD, default: today)
        date: Option<String>,
    },

    /// Toggle completion of a duty
    Duty { date: String, name: String },

    /// Show a profile
    Profile {
        /// Username (default: you)
        username: Option<String>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", render_error(&err));
            ExitCode::FAILURE
        }
    }
}

/// Server messages are printed as sent; local failures keep their context
fn render_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ApiError>() {
        Some(api) if api.is_remote() => api.to_string(),
        Some(ApiError::NotAuthenticated) => {
            "Not signed in. Run `cyclefit login` first.".to_string()
        }
        _ => format!("Error: {:#}", err),
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.client.base_url = url.clone();
    }

    init_logging(&config.logging);

    let store = SessionStore::new(config.session.resolved_dir());
    let credential = store.load();
    let client = RequestClient::new(config.client.clone())?;
    let api = CycleApi::new(&client, credential.as_ref());
    let json = cli.format == "json";

    match cli.command {
        Commands::Login { username, password } => {
            api.sign_in(&username, &password).await?;
            store.login(&username, &password)?;
            println!("Signed in as {}", username);
        }

        Commands::Register { username, password } => {
            let response = api.sign_up(&username, &password).await?;
            store.login(&username, &password)?;
            println!("{}", response["verdict"].as_str().unwrap_or("Registered"));
        }

        Commands::Logout => {
            store.logout()?;
            println!("Signed out");
        }

        Commands::Whoami => match &credential {
            Some(user) => println!("{}", user.username),
            None => println!("Not signed in"),
        },

        Commands::Get { path } => {
            let data = client.get(&path).await?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }

        Commands::Post { path, body, auth: with_auth } => {
            let mut body: Value = serde_json::from_str(&body).context("--body is not valid JSON")?;
            if with_auth {
                if credential.is_none() {
                    bail!("Not signed in. Run `cyclefit login <username>` first.");
                }
                body = auth(credential.as_ref(), body);
            }
            let data = client.post(&path, body).await?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }

        Commands::Preview {
            start,
            training,
            rest,
            horizon,
        } => {
            let start = match start.as_deref() {
                None => Some(Local::now().date_naive()),
                Some(s) => parse_date(s),
            };
            let horizon = horizon.unwrap_or(config.schedule.horizon_days);
            let entries = project(start, training, rest, horizon);

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("Nothing to preview: start date must be YYYY-MM-DD.");
            } else {
                print_preview(&entries);
            }
        }

        Commands::Month { year, month, plan } => {
            let today = Local::now().date_naive();
            let year = year.unwrap_or(today.year());
            let month = month.unwrap_or(today.month());

            let plans = if plan.is_empty() {
                api.cycle_plans().await?
            } else {
                plan.iter()
                    .map(|p| {
                        CyclePlan::parse(p)
                            .with_context(|| format!("invalid plan {:?}, use START:TRAINING:REST", p))
                    })
                    .collect::<anyhow::Result<Vec<_>>>()?
            };

            let load = month_load(&plans, year, month);
            if json {
                println!("{}", serde_json::to_string_pretty(&load)?);
            } else {
                for (date, count) in &load.days {
                    println!("{}  {}", date.format("%a %d"), "#".repeat(*count as usize));
                }
                println!();
                println!("Busiest day: {} cycle(s)", load.max);
            }
        }

        Commands::Cycles => {
            let cycles = api.user_cycles().await?;
            if cycles.is_empty() {
                println!("No cycles yet.");
            } else {
                println!("{:<24} {:<8} {:<6} {}", "Name", "Train", "Rest", "Start");
                println!("{}", "-".repeat(52));
                for cycle in cycles {
                    println!(
                        "{:<24} {:<8} {:<6} {}",
                        cycle.name, cycle.days_count, cycle.pause, cycle.start_at
                    );
                }
            }
        }

        Commands::Feed => {
            let cycles = api.feed().await?;
            if cycles.is_empty() {
                println!("Your feed is empty. Follow someone to fill it.");
            }
            for cycle in cycles {
                println!(
                    "{:<24} by {:<16} {} in",
                    cycle.name,
                    cycle.user.as_deref().unwrap_or("-"),
                    cycle.ins_count
                );
            }
        }

        Commands::Day { date } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive().to_string());
            let day = api.day(&date).await?;
            if day.duties.is_empty() {
                println!("Rest day.");
            }
            for (name, done) in &day.duties {
                let mark = if *done != 0 { "x" } else { " " };
                println!("[{}] {}", mark, name);
            }
        }

        Commands::Duty { date, name } => {
            api.toggle_duty(&date, &name).await?;
            println!("Toggled {:?} on {}", name, date);
        }

        Commands::Profile { username } => {
            let username = match (username, &credential) {
                (Some(name), _) => name,
                (None, Some(user)) => user.username.clone(),
                (None, None) => bail!("Not signed in. Pass a username."),
            };
            let (profile, followers) =
                tokio::try_join!(api.profile(&username), api.followers(&username))?;

            let mut data = profile;
            if let Value::Object(fields) = &mut data {
                fields.insert("followers".to_string(), followers);
            }
            println!("{}", serde_json::to_string_pretty(&data)?);
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

/// Logs go to stderr so command output stays parseable.
fn init_logging(config: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("cyclefit={}", config.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn print_preview(entries: &[SchedulePreviewEntry]) {
    println!("{:<12} {:<4} {}", "Date", "Day", "Plan");
    println!("{}", "-".repeat(30));
    for entry in entries {
        let plan = match entry.training_day_index {
            Some(index) => format!("training day {}", index),
            None => "rest".to_string(),
        };
        println!(
            "{:<12} {:<4} {}",
            entry.date.to_string(),
            entry.date.format("%a"),
            plan
        );
    }
}
