mod app;
mod cli;
mod logging;
mod notifications;
mod persistence;
mod settings;

use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run(cli::Args::parse()).await
}
