//! CLI runner - executes commands

use crate::analyzer::{AnalysisRequest, FollowBackAnalyzer};
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::AppConfig;
use crate::error::Result;
use crate::session::{Session, SessionView};
use crate::types::Threshold;
use std::sync::Arc;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Under { page } => self.analyze(Threshold::Under10k, *page).await,
            Commands::Above { page } => self.analyze(Threshold::Above10k, *page).await,
            Commands::Share => self.share(),
            Commands::Serve { port } => {
                let config = crate::cli::ServerConfig {
                    app: self.load_config()?,
                };
                crate::cli::serve(config, *port).await
            }
        }
    }

    /// Config file, then environment, then flags
    pub fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.cli.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        config.apply_env()?;

        if let Some(key) = &self.cli.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(fid) = self.cli.fid {
            config.client_fid = Some(fid);
        }
        if let Some(url) = &self.cli.base_url {
            config.base_url = url.clone();
        }
        if let Some(max_pages) = self.cli.max_pages {
            config.max_pages = max_pages;
        }

        config.validate()?;
        Ok(config)
    }

    /// Run one analysis; Ctrl-C cancels it
    async fn analyze(&self, threshold: Threshold, page: usize) -> Result<()> {
        let config = self.load_config()?;
        let fetcher = config.build_fetcher()?;
        let analyzer = FollowBackAnalyzer::new(Arc::new(fetcher));
        let request = AnalysisRequest::new(threshold, config.client_fid()?, config.required_fid);

        let mut session = Session::new();
        let ticket = session.begin_analysis(threshold);

        let cancel = ticket.cancel.clone();
        let interrupt = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });

        info!(
            "Analysing fid {} ({})",
            request.acting_fid,
            threshold.title()
        );
        let outcome = analyzer.analyze(&request, &ticket.cancel).await;
        interrupt.abort();

        let outcome = outcome?;
        session.finish_analysis(ticket.id, Ok(outcome));
        session.set_page(page);

        self.print_view(&session.snapshot())
    }

    /// Print the share link
    fn share(&self) -> Result<()> {
        let mut session = Session::new();
        session.share()?;
        self.print_view(&session.snapshot())
    }

    fn print_view(&self, view: &SessionView) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(view)?),
            OutputFormat::Pretty => println!("{}", render_pretty(view)),
        }
        Ok(())
    }
}

/// Plain-text rendering of a view
pub fn render_pretty(view: &SessionView) -> String {
    let mut lines = Vec::new();

    if let Some(title) = &view.title {
        lines.push(title.clone());
        lines.push("=".repeat(title.chars().count()));
    }

    let offset = (view.page.saturating_sub(1)) * crate::session::ITEMS_PER_PAGE;
    for (i, item) in view.items.iter().enumerate() {
        let mut line = format!(
            "{:>4}. {} ({} followers)",
            offset + i + 1,
            item.label,
            item.follower_count
        );
        if let Some(url) = &item.profile_url {
            line.push_str("  ");
            line.push_str(url);
        }
        lines.push(line);
    }

    if view.total_pages > 0 {
        lines.push(format!(
            "Page {} of {} ({} accounts)",
            view.page, view.total_pages, view.total_results
        ));
    }

    if let Some(link) = &view.share_link {
        lines.push("Copy this link to share the frame:".to_string());
        lines.push(link.clone());
    }

    if let Some(message) = &view.message {
        lines.push(message.clone());
    }

    lines.join("\n")
}
