//! Form Builder CLI - command line client for the Bahmni form builder
//!
//! Lists, creates and imports observation forms through the OpenMRS REST
//! API.

mod api;
mod cli;
mod config;
mod controller;
mod error;
mod locale;
mod notify;
mod services;
mod state;
mod ui;

use anyhow::Result;
use clap::Parser;
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "form_builder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = cli::Cli::parse();

    match cli::run(args).await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("Error: {err:?}");
            std::process::exit(1);
        }
    }
}
