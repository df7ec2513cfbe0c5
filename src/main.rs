//! # Newspaper Desk
//!
//! A front-end for a newspaper generation backend. It collects the topics a
//! reader wants covered, a layout, a language and a length mode, asks the
//! backend to write the edition, and opens the result.
//!
//! ## Usage
//!
//! ```sh
//! newspaper_desk -t "climate" -t "elections" --layout layout_2.html
//! newspaper_desk --interactive
//! ```
//!
//! ## Architecture
//!
//! 1. **Form**: topic fields, layout icons and selects live in a [`form::TopicForm`]
//! 2. **Controller**: page events mutate the form and trigger submission
//! 3. **Backend**: one `POST /api/generate_newspaper` per submission
//! 4. **Page**: alerts, loading messages and navigation on the terminal

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod cli;
mod config;
mod controller;
mod error;
mod form;
mod loading;
mod models;
mod page;
mod shell;
mod utils;

use api::HttpGenerator;
use cli::Cli;
use config::DeskConfig;
use controller::{DeskController, FormEvents};
use form::TopicForm;
use loading::LoadingIndicator;
use shell::TerminalPage;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("newspaper_desk starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Load config; CLI flags win ----
    let mut config = match &args.config {
        Some(path) => DeskConfig::load(path).await?,
        None => DeskConfig::default(),
    };
    if let Some(server) = &args.server {
        config.server = server.clone();
    }
    if let Some(secs) = args.message_interval_secs {
        config.message_interval_secs = secs;
    }
    config.validate()?;
    let server = config.server_url()?;

    // ---- Page load ----
    let form = TopicForm::new(
        &config.layouts,
        &config.default_layout,
        &config.languages,
        &config.default_language,
    );
    let generator = HttpGenerator::new(&server)?;
    info!(%server, endpoint = %generator.endpoint(), "Using generation server");
    let page = Arc::new(TerminalPage::new(server.clone()));
    let loading = LoadingIndicator::new(Duration::from_secs(config.message_interval_secs));
    let controller = DeskController::new(form, generator, page.clone(), loading);

    // ---- Pre-fill from flags, in the order a reader would click ----
    let prefilled = prefill(&controller, &args);

    let outcome = if args.interactive {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        shell::run_interactive(&controller, stdin, &mut stdout).await?
    } else if !prefilled {
        return Err("the form was rejected; see the messages above".into());
    } else {
        controller.on_submit().await.ok()
    };

    let elapsed = start_time.elapsed();
    match (outcome, page.location()) {
        (Some(path), location) => {
            info!(%path, location = ?location.map(|u| u.to_string()), secs = elapsed.as_secs(), "Newspaper produced");
            Ok(())
        }
        (None, _) if args.interactive => {
            info!(secs = elapsed.as_secs(), "Session ended without producing a newspaper");
            Ok(())
        }
        (None, _) => {
            error!(secs = elapsed.as_secs(), phase = ?controller.phase(), "No newspaper was produced");
            Err("no newspaper was produced".into())
        }
    }
}

/// Replay the CLI options as form events. Returns false if any was refused.
fn prefill<C: FormEvents>(controller: &C, args: &Cli) -> bool {
    let mut ok = true;
    controller.on_length_change(args.length);
    if let Some(layout) = &args.layout {
        ok &= controller.on_layout_pick(layout).is_ok();
    }
    if let Some(language) = &args.language {
        ok &= controller.on_language_change(language).is_ok();
    }
    for (i, topic) in args.topics.iter().enumerate() {
        let id = i + 1;
        if id > 1 {
            match controller.on_add() {
                Ok(_) => {}
                Err(_) => return false,
            }
        }
        ok &= controller.on_topic_input(id, topic).is_ok();
    }
    ok
}
