use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveTime;
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use weatherfit_core::delivery::telegram::TelegramDelivery;
use weatherfit_core::model::OutcomeStatus;
use weatherfit_core::outfit::RandomPicker;
use weatherfit_core::store::postgres::PgStore;
use weatherfit_core::weather::openweather::OpenWeatherClient;
use weatherfit_core::{Config, DispatchFilter, Dispatcher};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherfit", version, about = "WeatherFit notification service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create or upgrade the database schema.
    InitDb,

    /// Insert a small realistic wardrobe catalog.
    Seed,

    /// Run a notification dispatch.
    ///
    /// With --time, only users whose notification time matches exactly are
    /// targeted (the scheduled path). Without it, every eligible user is
    /// targeted regardless of their configured time, the "send now" path.
    Notify {
        /// Notification cohort to fire, as HH:MM.
        #[arg(long)]
        time: Option<String>,

        /// Restrict the run to a single user, for manual testing.
        #[arg(long)]
        user: Option<Uuid>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(config.database_url()?)
            .await
            .context("failed to connect to Postgres")?;
        let store = Arc::new(PgStore::new(pool));

        match self.command {
            Command::InitDb => {
                store.migrate().await?;
                println!("Schema ready.");
            }
            Command::Seed => {
                let inserted = store.seed_wardrobe().await?;
                println!("Inserted {inserted} wardrobe items.");
            }
            Command::Notify { time, user } => {
                let filter = DispatchFilter {
                    time: time.as_deref().map(parse_time).transpose()?,
                    user_id: user,
                };

                let weather = Arc::new(OpenWeatherClient::new(
                    config.openweather_api_key()?.to_string(),
                ));
                let delivery = Arc::new(TelegramDelivery::new(
                    config.telegram_bot_token()?.to_string(),
                ));

                let mut dispatcher = Dispatcher::new(
                    store.clone(),
                    store.clone(),
                    store,
                    weather,
                    delivery,
                    config.media_base_url()?.to_string(),
                    Box::new(RandomPicker::new()),
                );

                let summary = dispatcher.run(&filter).await?;

                println!("{}", summary.message);
                for outcome in &summary.outcomes {
                    match outcome.status {
                        OutcomeStatus::Sent => {
                            println!("- {} ({}): sent", outcome.name, outcome.user_id);
                        }
                        OutcomeStatus::Failed => {
                            println!(
                                "- {} ({}): failed: {}",
                                outcome.name,
                                outcome.user_id,
                                outcome.error.as_deref().unwrap_or("unknown error"),
                            );
                        }
                    }
                }

                if !summary.success {
                    anyhow::bail!("dispatch run failed: {}", summary.message);
                }
            }
        }

        Ok(())
    }
}

fn parse_time(value: &str) -> anyhow::Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .with_context(|| format!("invalid --time '{value}', expected HH:MM"))
}
