//! Watch a YAML configuration file and print every settled change.
//!
//! Run with: cargo run --example watch_file
//!
//! While running, edit demos/config/watch_file.yaml. Ctrl+C stops the watcher.

use config_watcher::prelude::*;
use config_watcher::template::{Field, Template, render};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Deserialize, Clone)]
struct AppConfig {
    server: ServerConfig,
    log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
struct ServerConfig {
    host: String,
    port: u16,
}

impl Template for AppConfig {
    fn fields() -> Vec<Field> {
        vec![
            Field::section(
                "server",
                vec![
                    Field::string("host").default("localhost").help("Bind address"),
                    Field::scalar("port").default("8080").help("Listen port"),
                ],
            ),
            Field::string("log_level").default("info").help("Log verbosity"),
        ]
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> std::result::Result<(), ValidationError> {
        if self.server.port == 0 {
            return Err(ValidationError::invalid_field("server.port", "must be non-zero"));
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config_path = Path::new("demos/config/watch_file.yaml");
    if !config_path.exists() {
        if let Some(dir) = config_path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| WatchError::LoadError(e.to_string()))?;
        }
        std::fs::write(config_path, render::<AppConfig>())
            .map_err(|e| WatchError::LoadError(e.to_string()))?;
        println!("Created {} from template", config_path.display());
    }

    let cancel = CancellationToken::new();
    let mut changes = watch(
        cancel.clone(),
        config_path,
        FileReader::<AppConfig>::new(config_path).validated(),
        WatchOptions::new()
            .with_debounce(Duration::from_millis(250))
            .with_logger(TracingLogger)
            .with_change_logging(true),
    )?;

    let cfg = changes.initial();
    println!(
        "Watching {} (server {}:{}, log level {})",
        config_path.display(),
        cfg.server.host,
        cfg.server.port,
        cfg.log_level
    );
    println!("Press Ctrl+C to exit\n");

    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    while let Some(change) = changes.recv().await {
        let (before, after) = change.into_parts();
        println!(
            "[Change] server {}:{} -> {}:{}, log level {} -> {}",
            before.server.host,
            before.server.port,
            after.server.host,
            after.server.port,
            before.log_level,
            after.log_level
        );
    }

    println!("Watcher closed");
    Ok(())
}
