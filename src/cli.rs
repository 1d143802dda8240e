mod check;
mod discover;
mod emulate;
mod inverter;
mod watch;

use clap::{Parser, Subcommand};

use crate::{
    cli::{check::CheckArgs, discover::DiscoverArgs, emulate::EmulateArgs, watch::WatchArgs},
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: poll the inverter and print every update.
    Watch(Box<WatchArgs>),

    /// Fetch the page once to confirm that the host is a reachable inverter.
    Check(Box<CheckArgs>),

    /// Scan a subnet for inverters.
    Discover(DiscoverArgs),

    /// Serve a fake inverter page.
    Emulate(EmulateArgs),
}

impl Command {
    pub async fn run(self) -> Result {
        match self {
            Self::Watch(args) => args.run().await,
            Self::Check(args) => args.run().await,
            Self::Discover(args) => args.run().await,
            Self::Emulate(args) => args.run().await,
        }
    }
}
