use gadgethub_dashboard::{
    adapters::{config::app_config::AppConfig, sheets::google_sheets::GoogleSheetsConnector},
    prettyprint::prettyprint::PrettyFormatter,
    SheetClient, SpreadsheetDashboard, WorksheetLoader,
};
use std::{env, sync::Arc, time::Duration};
use tracing::{error, info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Registry};

mod cli;

use cli::cli_adapter::CliAdapter;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_tracing()?;
    setup_panic_hook();

    let args: Vec<String> = env::args().collect();

    info!("Starting GadgetHub dashboard");

    let config = AppConfig::load().map_err(|e| {
        error!("Could not load configuration: {:?}", e);
        format!("{}", e.current_context())
    })?;

    let client = Arc::new(SheetClient::new(GoogleSheetsConnector::new(
        config.sheets.clone(),
    )));
    let loader = WorksheetLoader::new(client, config.sheets.cache_ttl());
    let dashboard = Arc::new(SpreadsheetDashboard::new(
        config.sheets.spreadsheet_id.as_ref(),
        loader,
    ));

    let refresh_interval = Duration::from_secs(config.dashboard.refresh_interval_secs.max(1));
    let cli_adapter = CliAdapter::new(dashboard, refresh_interval);

    match cli_adapter.run(args).await {
        Ok(_) => {
            info!("Dashboard finished");
            Ok(())
        }
        Err(e) => {
            error!("Dashboard failed: {:?}", e);
            Err(e)
        }
    }
}

fn setup_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(PrettyFormatter::new(true))
        .with_writer(std::io::stderr);

    let log_file_layer = tracing_subscriber::fmt::layer()
        .event_format(PrettyFormatter::new(false))
        .with_writer(std::fs::File::create("gadgethub_dashboard.log")?)
        .with_ansi(false);

    Registry::default()
        .with(
            tracing_subscriber::filter::Targets::new()
                .with_target("gadgethub_dashboard", tracing::Level::INFO),
        )
        .with(log_file_layer)
        .with(stderr_layer)
        .init();

    Ok(())
}

fn setup_panic_hook() {
    tracing::trace!("Setting panic hook");
    std::panic::set_hook(Box::new(|info| {
        tracing::error!("panic: {info}");
    }));
}
