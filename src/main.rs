use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use xuml_schema::cli::Args;
use xuml_schema::config::ConfigFile;
use xuml_schema::db::DatabaseConfig;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Logs go to stderr so formatted output on stdout stays parseable
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| args.log_directive().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ConfigFile::load(args.config.as_deref())?;
    let db_config = DatabaseConfig::resolve(args.db.as_deref(), config.as_ref())?;
    tracing::debug!(?db_config, "Opening database");
    let mut db = db_config.connect()?;

    let package = config.map(|c| c.package).unwrap_or_default();
    let output = args.command.run(db.as_mut(), &package, args.format)?;
    println!("{}", output);
    Ok(())
}
