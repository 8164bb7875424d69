use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::sync::Arc;
use tracing::info;

use guardia::config::Config;
use guardia::db::Database;
use guardia::location::fixed::FixedLocationProvider;
use guardia::notify::traits::NotificationDispatcher;
use guardia::scoring::risk::{RiskScorer, RiskWeights};

/// Guardia: personal-safety SOS assistant.
///
/// Scores how risky your current situation looks and alerts your emergency
/// contacts with your location when you trigger SOS.
#[derive(Parser)]
#[command(name = "guardia", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Compute the danger score for a location
    Score {
        #[command(flatten)]
        location: LocationArgs,
    },

    /// Trigger SOS: score, log the incident, and alert emergency contacts
    Sos {
        #[command(flatten)]
        location: LocationArgs,

        /// Fail instead of printing the alert when no SMS gateway is configured
        #[arg(long)]
        deliver: bool,
    },

    /// Show recent SOS events
    History {
        /// Number of events to show (default: 10)
        #[arg(long, default_value = "10")]
        limit: u32,
    },

    /// Manage contacts
    Contacts {
        #[command(subcommand)]
        action: ContactsAction,
    },

    /// List emergency helpline numbers
    Helplines,

    /// Show system status (DB stats, contacts, last SOS)
    Status,
}

#[derive(Subcommand)]
enum ContactsAction {
    /// Add a contact
    Add {
        name: String,
        phone: String,

        /// Keep the contact but don't alert them on SOS
        #[arg(long)]
        not_emergency: bool,
    },

    /// List contacts
    List,

    /// Remove a contact by id
    Remove { id: String },
}

/// Where you are right now.
#[derive(Args)]
struct LocationArgs {
    /// Latitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Longitude in degrees
    #[arg(long, allow_negative_numbers = true)]
    lng: f64,

    /// Current speed in m/s
    #[arg(long)]
    speed: Option<f64>,

    /// Position accuracy in meters
    #[arg(long)]
    accuracy: Option<f64>,

    /// Time of the reading as RFC 3339 (default: now)
    #[arg(long)]
    at: Option<String>,
}

impl LocationArgs {
    fn provider(&self) -> Result<FixedLocationProvider> {
        let timestamp = match &self.at {
            Some(raw) => Some(
                chrono::DateTime::parse_from_rfc3339(raw)
                    .with_context(|| format!("--at is not an RFC 3339 timestamp: {raw}"))?
                    .timestamp_millis(),
            ),
            None => None,
        };
        Ok(FixedLocationProvider::new(self.lat, self.lng)
            .with_speed(self.speed)
            .with_accuracy(self.accuracy)
            .at(timestamp))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("guardia=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            info!("Initializing Guardia database...");
            let config = Config::load()?;
            let db = guardia::db::initialize_sqlite(&config.db_path)?;
            let table_count = db.table_count().await?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nNext step: add an emergency contact");
            println!("  guardia contacts add \"Name\" +15551234567");
        }

        Commands::Score { location } => {
            let config = Config::load()?;
            let db = guardia::db::open_sqlite(&config.db_path)?;
            let provider = location.provider()?;
            let scorer = build_scorer(&config);

            let assessment = guardia::pipeline::assess::run(
                &provider,
                db.as_ref(),
                &scorer,
                &config.user_id,
                config.location_timeout,
            )
            .await?;

            guardia::output::terminal::display_score(
                &assessment.sample,
                &assessment.result,
                &config.zone,
            );
        }

        Commands::Sos { location, deliver } => {
            let config = Config::load()?;
            let db = guardia::db::open_sqlite(&config.db_path)?;
            let provider = location.provider()?;
            let scorer = build_scorer(&config);
            let dispatcher = create_dispatcher(&config, deliver)?;

            println!("{}", "Sending SOS...".red().bold());

            let report = guardia::pipeline::sos::run(
                db.as_ref(),
                &provider,
                dispatcher.as_ref(),
                &scorer,
                &config.user_id,
                config.location_timeout,
            )
            .await?;

            guardia::output::terminal::display_sos_report(&report, &config.zone);
            report.ensure_delivered()?;
        }

        Commands::History { limit } => {
            let config = Config::load()?;
            let db = guardia::db::open_sqlite(&config.db_path)?;
            let incidents = db.fetch_recent_incidents(&config.user_id, limit).await?;
            guardia::output::terminal::display_history(&incidents, &config.zone);
        }

        Commands::Contacts { action } => {
            let config = Config::load()?;
            let db = guardia::db::open_sqlite(&config.db_path)?;
            run_contacts(action, &db, &config.user_id).await?;
        }

        Commands::Helplines => {
            guardia::output::terminal::display_helplines(guardia::helplines::HELPLINES);
        }

        Commands::Status => {
            let config = Config::load()?;
            if !guardia::status::is_initialized(&config.db_path) {
                println!("Database: not initialized");
                println!("\nRun `guardia init` to set up the database.");
                return Ok(());
            }
            let db = guardia::db::open_sqlite(&config.db_path)?;
            guardia::status::show(&db, &config.db_path, &config.user_id, &config.zone)
                .await?;
        }
    }

    Ok(())
}

async fn run_contacts(action: ContactsAction, db: &Arc<dyn Database>, user_id: &str) -> Result<()> {
    match action {
        ContactsAction::Add {
            name,
            phone,
            not_emergency,
        } => {
            let existing = db.list_contacts(user_id).await?;
            let contact = guardia::contacts::new_contact(&existing, &name, &phone, !not_emergency)?;
            db.upsert_contact(user_id, &contact).await?;
            println!("Added {} ({}) [{}]", contact.name, contact.phone, contact.id);
        }
        ContactsAction::List => {
            let contacts = db.list_contacts(user_id).await?;
            guardia::output::terminal::display_contacts(&contacts);
        }
        ContactsAction::Remove { id } => {
            if db.delete_contact(user_id, &id).await? {
                println!("Removed contact {id}");
            } else {
                anyhow::bail!("No contact with id {id}. Run `guardia contacts list` to see ids.");
            }
        }
    }
    Ok(())
}

/// The default scorer, reading hours in the configured time zone.
fn build_scorer(config: &Config) -> RiskScorer {
    RiskScorer::new(RiskWeights::default()).with_zone(config.zone)
}

/// Pick the alert channel: the SMS gateway when configured, otherwise print.
fn create_dispatcher(config: &Config, deliver: bool) -> Result<Box<dyn NotificationDispatcher>> {
    if deliver {
        config.require_webhook()?;
    }
    match &config.sms_webhook_url {
        Some(url) => {
            info!("Using SMS gateway webhook");
            Ok(Box::new(guardia::notify::webhook::WebhookDispatcher::new(
                url.clone(),
            )))
        }
        None => Ok(Box::new(guardia::notify::console::ConsoleDispatcher)),
    }
}
