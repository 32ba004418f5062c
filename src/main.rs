use clap::Parser;
use stakebook::betslip::Betslip;
use stakebook::cli::{Cli, Commands};
use stakebook::config::Config;
use stakebook::store::{BetStore, JsonFileStore};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            toml::from_str(include_str!("../config.toml.example"))?
        }
    };

    // Initialize telemetry
    let _telemetry = stakebook::telemetry::init_telemetry(&config.telemetry)?;

    let store: Arc<dyn BetStore> = Arc::new(JsonFileStore::new(&config.store.path));
    let betslip = Betslip::new(store, &config.staking);

    match cli.command {
        Commands::Price(args) => args.execute(&config.staking)?,
        Commands::Add(args) => args.execute(&betslip).await?,
        Commands::Odds(args) => args.execute(&betslip).await?,
        Commands::Status(args) => args.execute(&betslip).await?,
        Commands::Remove(args) => args.execute(&betslip).await?,
        Commands::Recompute(args) => args.execute(&betslip).await?,
        Commands::List(args) => args.execute(&betslip).await?,
        Commands::Settle(args) => args.execute(&betslip).await?,
        Commands::Unsettle(args) => args.execute(&betslip).await?,
        Commands::Grade(args) => args.execute(&betslip, &config.feed).await?,
        Commands::Archive(args) => args.execute(&betslip).await?,
        Commands::Finalize(args) => args.execute(&betslip).await?,
        Commands::Summary(args) => args.execute(&betslip).await?,
        Commands::Config => {
            let staking = &config.staking;
            println!("Current configuration:");
            println!(
                "  Staking: bankroll={}u, Kelly={}, max bet={}u, exposure cap={}u, min edge={}%",
                staking.bankroll_units,
                staking.kelly_fraction,
                staking.max_bet_units(),
                staking.exposure_cap_units(),
                staking.min_edge * 100.0
            );
            println!(
                "  Multipliers: default={}, matchup2={}, matchup3={}",
                staking.multipliers.default, staking.multipliers.matchup2, staking.multipliers.matchup3
            );
            println!("  Store: {}", config.store.path.display());
            println!("  Feed: {} (tour {}, key from ${})", config.feed.base_url, config.feed.tour, config.feed.api_key_env);
        }
    }

    Ok(())
}
