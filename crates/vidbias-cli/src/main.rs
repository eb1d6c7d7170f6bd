mod analyze;
mod channels;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "vidbias")]
#[command(about = "Video transcript bias and sentiment analysis")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze videos by URL or id; stored analyses are reused
    Analyze {
        /// Video URLs or 11-character ids
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Maximum number of videos analyzed at once
        #[arg(long, default_value_t = 2)]
        concurrency: usize,

        /// Also print model commentary for each video
        #[arg(long)]
        commentary: bool,
    },
    /// Show a stored analysis without computing anything
    Show {
        /// Video URL or id
        input: String,

        /// Also print model commentary
        #[arg(long)]
        commentary: bool,
    },
    /// List analyzed channels
    Channels,
    /// Show bias averages and recent videos for one channel
    Channel {
        /// Channel name as stored
        name: String,

        /// Maximum number of videos to list
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = vidbias_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = vidbias_db::PoolConfig::from_app_config(&config);
    let pool = vidbias_db::connect_pool(&config.database_url, pool_config).await?;

    match cli.command {
        Commands::Analyze {
            inputs,
            concurrency,
            commentary,
        } => analyze::run_analyze(&config, pool, &inputs, concurrency, commentary).await?,
        Commands::Show { input, commentary } => {
            analyze::run_show(&config, pool, &input, commentary).await?;
        }
        Commands::Channels => channels::run_channels(&pool).await?,
        Commands::Channel { name, limit } => channels::run_channel(&pool, &name, limit).await?,
        Commands::Migrate => {
            let applied = vidbias_db::run_migrations(&pool).await?;
            println!("migrations applied: {applied}");
        }
    }

    Ok(())
}
