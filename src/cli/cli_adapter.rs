use std::{future::Future, sync::Arc, time::Duration};

use gadgethub_dashboard::{
    ports::dashboard_service::DashboardService, prettyprint::table_grid::render_tab,
    WorksheetName,
};
use tracing::{error, info, instrument, warn};

use super::command::{Command, CommandError};

const TITLE: &str = "GadgetHub Datasets Dashboard";

const INTRO: &str = "\
Welcome to the GadgetHub Data Dashboard! This application allows you to explore various datasets
related to our products, sales operations, and performance metrics, all sourced directly from
Google Sheets. Each tab below shows one of the datasets.";

const FOOTER: &str = "\
---
You can read the LinkedIn post here: https://www.linkedin.com/posts/abdul-samad-abdul-jaleel_grassrootsdatascience-dashboardthinking-buildwhatmatters-activity-7347403678149967872-Dnv3
For more detailed analysis or specific reports, send a DM.";

pub struct CliAdapter {
    dashboard: Arc<dyn DashboardService>,
    refresh_interval: Duration,
}

impl std::fmt::Debug for CliAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliAdapter")
            .field("dashboard", &"<DashboardService>")
            .field("refresh_interval", &self.refresh_interval)
            .finish()
    }
}

impl CliAdapter {
    pub fn new(dashboard: Arc<dyn DashboardService>, refresh_interval: Duration) -> Self {
        Self {
            dashboard,
            refresh_interval,
        }
    }

    #[instrument(skip(args))]
    pub async fn run(&self, args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
        let command = Command::parse(&args)?;

        if command == Command::Watch {
            self.watch().await;
            return Ok(());
        }

        match self.handle(command).await {
            Ok(output) => {
                println!("{}", output);
                Ok(())
            }
            Err(report) => {
                error!("Command failed: {:?}", report);
                Err(format!("Command failed: {}", report.current_context()).into())
            }
        }
    }

    #[instrument]
    pub async fn handle(&self, command: Command) -> error_stack::Result<String, CommandError> {
        match command {
            Command::Show { worksheet: None } | Command::Watch => self.render_all().await,
            Command::Show {
                worksheet: Some(worksheet),
            } => self.render_one(worksheet).await,
            Command::ListWorksheets => {
                let lines: Vec<String> = self
                    .dashboard
                    .list_worksheets()
                    .into_iter()
                    .map(|w| format!("{:<14} (tab: {})", w.as_ref(), w.tab_label()))
                    .collect();
                Ok(format!("Available worksheets:\n{}", lines.join("\n")))
            }
            Command::HealthCheck => {
                self.dashboard
                    .health_check()
                    .await
                    .map_err(|e| CommandError::ExecutionFailed {
                        details: format!("Health check failed: {}", e.current_context()),
                    })
                    .map_err(error_stack::Report::new)
            }
        }
    }

    async fn render_all(&self) -> error_stack::Result<String, CommandError> {
        let outcomes = self.dashboard.load_all().await.map_err(|e| {
            error_stack::Report::new(CommandError::ExecutionFailed {
                details: format!("Could not load the dashboard: {}", e.current_context()),
            })
        })?;

        let failures = outcomes.iter().filter(|o| !o.is_ok()).count();
        let mut output = format!("{}\n{}\n{}\n\n", TITLE, "=".repeat(TITLE.len()), INTRO);
        for outcome in &outcomes {
            output.push_str(&render_tab(outcome));
            output.push('\n');
        }
        output.push_str(&format!(
            "Summary: {} loaded, {} failed\n\n{}",
            outcomes.len() - failures,
            failures,
            FOOTER
        ));

        Ok(output)
    }

    async fn render_one(&self, worksheet: WorksheetName) -> error_stack::Result<String, CommandError> {
        self.dashboard.acquire_client().await.map_err(|e| {
            error_stack::Report::new(CommandError::ExecutionFailed {
                details: format!("Could not reach the spreadsheet: {}", e.current_context()),
            })
        })?;

        let outcome = self.dashboard.load_tab(worksheet).await;
        Ok(render_tab(&outcome))
    }

    /// Re-renders every tab each refresh interval until Ctrl-C. Cached
    /// worksheets are reused until their TTL runs out, and a failed pass is
    /// retried on the next tick.
    async fn watch(&self) {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Could not listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await
            }
        };
        self.watch_until(ctrl_c).await;
    }

    /// Runs render passes until `shutdown` completes, also in the middle of
    /// a pass. Returns the number of finished passes.
    pub async fn watch_until(&self, shutdown: impl Future<Output = ()>) -> usize {
        tokio::pin!(shutdown);
        let mut interval = tokio::time::interval(self.refresh_interval);
        let mut passes = 0;

        loop {
            let pass = async {
                interval.tick().await;
                match self.render_all().await {
                    Ok(output) => println!("{}\n", output),
                    Err(report) => error!("Render failed: {:?}", report),
                }
            };

            tokio::select! {
                _ = pass => passes += 1,
                _ = &mut shutdown => {
                    info!("Stopping watch after {} passes", passes);
                    return passes;
                }
            }
        }
    }
}
