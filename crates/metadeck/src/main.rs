// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `metadeck` - inspect MetaDeck configuration, settings and API servers.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use metadeck_config::MetaDeckConfig;
use metadeck_core::traits::SettingsStore;
use metadeck_core::MetaDeckError;
use metadeck_core::MetaDeckBus;
use metadeck_provider::{HttpServerList, IgdbServerSettings, ProviderServerResolver};
use metadeck_settings::JsonFileSettings;
use tracing::error;

#[derive(Parser, Debug)]
#[command(name = "metadeck", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve and print the selectable IGDB API servers.
    Servers,
    /// Validate configuration and print the effective values.
    CheckConfig,
    /// Print or change the persisted settings.
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    /// Select the server with this URL from the resolved options.
    Select { url: String },
    /// Clear the selected server.
    Unselect,
    /// Add a custom server.
    AddCustom { name: String, url: String },
    /// Remove custom servers with this URL.
    RemoveCustom { url: String },
    /// Rename a legacy metadeck.json to settings.json.
    Migrate,
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("metadeck={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match metadeck_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            metadeck_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };
    init_tracing(&config.plugin.log_level);

    let result = match cli.command {
        Commands::Servers => servers(&config).await,
        Commands::CheckConfig => check_config(&config),
        Commands::Settings { action } => settings(&config, action).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("metadeck: {e}");
            ExitCode::FAILURE
        }
    }
}

fn igdb_settings(config: &MetaDeckConfig, store: Arc<JsonFileSettings>) -> IgdbServerSettings {
    let source = Arc::new(HttpServerList::new(
        config.provider.official_servers_url.clone(),
    ));
    let resolver = Arc::new(ProviderServerResolver::with_timeout(
        source,
        config.provider.fetch_timeout(),
    ));
    IgdbServerSettings::new(store, resolver, MetaDeckBus::new())
}

async fn servers(config: &MetaDeckConfig) -> Result<(), MetaDeckError> {
    let store = Arc::new(JsonFileSettings::new(config.settings.resolved_dir()));
    let igdb = igdb_settings(config, store);
    let options = igdb.load().await?;
    let current = igdb.server().await;
    for option in options {
        let marker = if current.as_ref() == Some(&option.server) {
            '*'
        } else {
            ' '
        };
        println!("{marker} {}", option.label);
    }
    Ok(())
}

fn check_config(config: &MetaDeckConfig) -> Result<(), MetaDeckError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| MetaDeckError::Config(format!("failed to render config: {e}")))?;
    println!("# configuration OK");
    print!("{rendered}");
    Ok(())
}

async fn settings(
    config: &MetaDeckConfig,
    action: Option<SettingsAction>,
) -> Result<(), MetaDeckError> {
    let store = Arc::new(JsonFileSettings::new(config.settings.resolved_dir()));

    if let Some(action) = action {
        if let SettingsAction::Migrate = action {
            let moved = store.migrate_legacy().await?;
            println!("{}", if moved { "migrated" } else { "nothing to migrate" });
            return Ok(());
        }

        let igdb = igdb_settings(config, Arc::clone(&store));
        igdb.load().await?;
        match action {
            SettingsAction::Select { url } => {
                let option = igdb
                    .options()
                    .into_iter()
                    .find(|o| o.server.url == url)
                    .ok_or_else(|| {
                        MetaDeckError::Config(format!("no resolved API server has url `{url}`"))
                    })?;
                igdb.select(Some(option.server)).await?;
            }
            SettingsAction::Unselect => {
                igdb.select(None).await?;
            }
            SettingsAction::AddCustom { name, url } => {
                igdb.add_custom(name, url).await?;
            }
            SettingsAction::RemoveCustom { url } => {
                igdb.remove_custom(&url).await?;
            }
            SettingsAction::Migrate => {}
        }
    }

    let current = store.read_settings().await?;
    let rendered = serde_json::to_string_pretty(&current).map_err(|e| MetaDeckError::Settings {
        message: format!("failed to render settings: {e}"),
        source: Some(Box::new(e)),
    })?;
    println!("{rendered}");
    Ok(())
}
