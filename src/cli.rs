//! Command line interface

use crate::api::HttpFormClient;
use crate::config::ClientConfig;
use crate::controller::{ControllerSettings, FormBuilderController};
use crate::locale::{self, FileStore};
use crate::notify::ConsoleNotifier;
use crate::services::TranslationBatch;
use crate::state::{FormTranslation, Severity};
use crate::ui;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(
    name = "form-builder",
    version,
    about = "List, create and import observation forms on a Bahmni server"
)]
pub struct Cli {
    /// Server address, overriding configuration and environment
    #[arg(long, global = true)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Save connection settings
    Configure {
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// Stop fetching once the listing holds this many forms
        #[arg(long)]
        data_limit: Option<usize>,
    },
    #[command(flatten)]
    Remote(RemoteCommand),
}

/// Commands that talk to the server
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum RemoteCommand {
    /// List every form, ordered by name and version
    List {
        /// Keep refreshing the listing every SECONDS until interrupted
        #[arg(long, value_name = "SECONDS")]
        watch: Option<u64>,
    },
    /// Show the server's default locale
    Locale,
    /// Create an empty form and print its editor route
    Create { name: String },
    /// Import an exported form and its translations
    Import { file: PathBuf },
    /// Import translations for an existing form
    ImportTranslations { file: PathBuf },
}

/// Export file consumed by `import`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportBundle {
    pub form_json: Value,
    #[serde(default)]
    pub translations: Vec<FormTranslation>,
    #[serde(default)]
    pub form_name_translations: Option<Value>,
}

/// Export file consumed by `import-translations`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationBundle {
    #[serde(default)]
    pub translations: Vec<FormTranslation>,
    #[serde(default)]
    pub form_name_translations: Option<Value>,
}

impl From<TranslationBundle> for TranslationBatch {
    fn from(bundle: TranslationBundle) -> Self {
        Self {
            translations: bundle.translations,
            form_name_translations: bundle.form_name_translations,
        }
    }
}

/// Run a parsed command line. Returns false when the command ended in an error
/// the user has already been shown.
pub async fn run(cli: Cli) -> Result<bool> {
    let mut config = ClientConfig::load().context("Failed to load configuration")?;

    match cli.command {
        Some(Command::Configure {
            username,
            password,
            data_limit,
        }) => {
            if cli.server.is_some() {
                config.server_url = cli.server;
            }
            if username.is_some() {
                config.username = username;
            }
            if password.is_some() {
                config.password = password;
            }
            if data_limit.is_some() {
                config.data_limit = data_limit;
            }
            let path = config
                .save()?
                .context("No home directory to save configuration in")?;
            println!("Saved configuration to {}", path.display());
            Ok(true)
        }
        Some(Command::Remote(command)) => execute(config, cli.server, command).await,
        None => execute(config, cli.server, RemoteCommand::List { watch: None }).await,
    }
}

async fn execute(
    config: ClientConfig,
    server: Option<String>,
    command: RemoteCommand,
) -> Result<bool> {
    let mut resolved = config.resolve();
    if let Some(server) = server {
        resolved.server_url = server;
    }
    info!("Using server {}", resolved.server_url);

    let api = HttpFormClient::new(&resolved).context("Failed to set up the HTTP client")?;
    let store = FileStore::in_data_dir()?;
    let mut controller = FormBuilderController::new(
        Box::new(api),
        Box::new(ConsoleNotifier),
        Box::new(store),
        ControllerSettings::from(&resolved),
    );

    match command {
        RemoteCommand::List { watch } => {
            controller.mount().await;
            print!("{}", ui::render_listing(&controller.view()));
            if let Some(default_locale) = &controller.state.default_locale {
                println!("Default locale: {default_locale}");
            }
            if let Some(seconds) = watch {
                watch_listing(&mut controller, Duration::from_secs(seconds.max(1))).await;
            }
        }
        RemoteCommand::Locale => {
            controller.fetch_default_locale().await;
            let locale = match locale::default_locale() {
                Some(locale) => Some(locale),
                None => {
                    let cached = controller.cached_default_locale();
                    if let Some(locale) = &cached {
                        controller.set_message(
                            format!("Using cached default locale {locale}"),
                            Severity::Info,
                        );
                    }
                    cached
                }
            };
            return match locale {
                Some(locale) => {
                    println!("{locale}");
                    Ok(true)
                }
                None => Ok(false),
            };
        }
        RemoteCommand::Create { name } => match controller.save_form(&name).await {
            Some(route) => println!("{route}"),
            None => return Ok(false),
        },
        RemoteCommand::Import { file } => match read_json::<ImportBundle>(&file) {
            Ok(bundle) => {
                controller
                    .save_form_resource(
                        bundle.form_json,
                        bundle.translations,
                        bundle.form_name_translations,
                    )
                    .await;
                if !ended_in_error(&controller) {
                    print!("{}", ui::render_listing(&controller.view()));
                }
            }
            Err(e) => controller.on_validation_error(&format!("{e:#}")),
        },
        RemoteCommand::ImportTranslations { file } => {
            match read_json::<TranslationBundle>(&file) {
                Ok(bundle) => controller.save_translations(bundle.into()).await,
                Err(e) => controller.on_validation_error(&format!("{e:#}")),
            }
        }
    }

    Ok(!ended_in_error(&controller))
}

/// Refresh and reprint the listing on a fixed interval until Ctrl+C.
/// Notifications whose deadline passed are cleared between refreshes.
async fn watch_listing(controller: &mut FormBuilderController, period: Duration) {
    let mut interval = tokio::time::interval(period);
    // The first tick completes immediately
    interval.tick().await;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = interval.tick() => {}
        }
        if controller.tick() {
            debug!("Notification expired");
        }
        controller.load().await;
        println!();
        print!("{}", ui::render_listing(&controller.view()));
    }
}

fn ended_in_error(controller: &FormBuilderController) -> bool {
    controller
        .view()
        .notification
        .is_some_and(|n| n.severity == Severity::Error)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid import file {}", path.display()))
}
