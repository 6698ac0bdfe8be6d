//! # civiclab TUI
//!
//! Terminal front end for browsing and contacting civic-tech projects:
//! tag filter selectors (flat or grouped by subcategory), the contact button
//! with its message composer, and the list of files attached to a project.
//!
//! Components keep their state on [`App`](app::App) and return `Effect`s; the
//! runtime performs those effects against the configured collaborators.

mod app;
mod ui;

use std::sync::Arc;

use anyhow::{Context, Result};
use civiclab_util::{AppConfig, Metrics, SiteLinks, TracingAnalyticsSink};

use crate::app::{App, AppData, SharedCtx};

/// Build the application from `config` and run the TUI until the user quits.
///
/// # Errors
///
/// Fails when a collaborator cannot be built from the configuration (bad site
/// URL, bad storage or contact endpoint, unreadable tag catalog) or when the
/// terminal cannot be set up.
pub async fn run(config: AppConfig) -> Result<()> {
    let ctx = SharedCtx {
        theme: ui::theme::load(config.theme.as_deref()),
        session: Arc::new(config.session),
        links: SiteLinks::new(&config.site_base_url).context("invalid site_base_url")?,
        metrics: Metrics::new(Arc::new(TracingAnalyticsSink)),
        storage: config.build_storage().context("could not set up file storage")?,
        contact: config.build_contact_messenger().context("could not set up contact delivery")?,
    };
    let catalog = config.load_tags().context("could not load the tag catalog")?;
    let data = AppData {
        catalog,
        project: config.project,
        files: config.files,
        file_field_id: config.file_field_id,
    };
    ui::runtime::run_app(App::new(ctx, data)).await
}
