mod cli;
mod config;
mod core;
mod domain;
mod error;
mod inpaint;
mod render;
mod session;
mod source;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = cli::CliArgs::parse();
    let default_filter = if args.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    // Submissions run as local tasks next to the session they report to
    let local = tokio::task::LocalSet::new();
    local.block_on(&runtime, cli::run(args))
}
