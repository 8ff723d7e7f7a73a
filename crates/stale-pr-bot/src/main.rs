use chrono::Utc;
use clap::Parser;
use gh_client::{DryRunClient, TokenResolver};
use stale_pr_bot::{logger, report, run, Cli};
use stale_pr_config::StaleConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A .env file is optional
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    logger::init(cli.verbose);

    log::info!("Starting stale-pr-bot");

    let mut config = StaleConfig::load(cli.config.as_deref())?;
    cli.apply_to(&mut config);
    let config = config.resolve()?;

    let client = gh_client::connect(&config.host, &TokenResolver::new()).await?;
    let outcome = if config.dry_run {
        log::info!("Dry run: writes are logged, not executed");
        run(&DryRunClient::new(client), &config, Utc::now()).await
    } else {
        run(&client, &config, Utc::now()).await
    };

    report(outcome, cli.summary_file.as_deref())?;
    log::info!("Exiting stale-pr-bot");
    Ok(())
}
