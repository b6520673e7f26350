mod api;
mod app;
mod browse;
mod commands;
mod config;
mod event;
mod logging;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(about = "A terminal back office for browsing store products and sales")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/storefront/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Store to open, overriding default_store
  #[arg(short, long)]
  store: Option<String>,

  /// View to start in
  #[arg(short, long, value_enum, default_value_t = app::ViewKind::Products)]
  view: app::ViewKind,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let config = config::Config::load(args.config.as_deref())?;
  let _log_guard = logging::init(&config.log)?;

  let store = args.store.or_else(|| config.initial_store());
  tracing::info!(view = ?args.view, store = ?store, api = %config.api.url, "starting storefront");

  let mut app = app::App::new(config, args.view, store)?;
  app.run().await?;

  Ok(())
}
