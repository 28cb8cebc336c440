use std::{
    io,
    path::{Path, PathBuf},
};

mod menu;
mod session;
mod terminal;

use anyhow::Context;
use clap::ArgAction;
use rebirth::{Config, Store};
use session::Session;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// The file items are stored in [default: items.txt]
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Don't clear the screen before drawing the menu
    #[arg(long)]
    no_clear: bool,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = self.resolve_config()?;
        let store = load_store(config.store())?;
        let clear = clears_screen(&config, terminal::stdout_is_terminal());

        let stdin = io::stdin();
        let stdout = io::stdout();
        Session::new(store, stdin.lock(), stdout.lock())
            .clear_screen(clear)
            .run()
            .context("Console I/O failed")?;

        Ok(())
    }

    /// Merges command-line flags over the configuration file, if any.
    #[instrument(skip(self))]
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => Config::default(),
        };

        if let Some(store) = &self.store {
            config.set_store(store.clone());
        }
        if self.no_clear {
            config.clear_screen = false;
        }

        tracing::debug!(?config, "resolved configuration");
        Ok(config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        // The filter comes from the flag alone; no environment variables are read.
        let filter = EnvFilter::default().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    Config::load(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

fn load_store(path: &Path) -> anyhow::Result<Store> {
    Store::load(path)
        .with_context(|| format!("Failed to load items from {}", path.display()))
}

/// Escape sequences are only written to a terminal, never to a pipe or file.
const fn clears_screen(config: &Config, is_terminal: bool) -> bool {
    config.clear_screen && is_terminal
}
