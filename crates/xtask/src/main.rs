use std::path::PathBuf;

use clap::{Parser, Subcommand};
use snafu::{ResultExt, Snafu};
use tracing_subscriber::EnvFilter;

mod crd;
mod defaults;

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("failed to generate CRD previews"))]
    Crd { source: crd::Error },

    #[snafu(display("failed to default configuration"))]
    Defaults { source: defaults::Error },
}

#[derive(Debug, Parser)]
enum Command {
    #[command(subcommand)]
    Crd(CrdCommand),

    /// Prints the given KubermaticConfiguration with all defaults applied.
    Defaults {
        /// Path to a YAML file containing a single KubermaticConfiguration.
        file: PathBuf,
    },
}

#[derive(Debug, Subcommand)]
enum CrdCommand {
    Preview,
}

#[snafu::report]
fn main() -> Result<(), Error> {
    // stdout carries the defaulted configuration.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let command = Command::parse();

    match command {
        Command::Crd(crd_command) => match crd_command {
            CrdCommand::Preview => crd::generate_preview().context(CrdSnafu),
        },
        Command::Defaults { file } => defaults::print_defaulted(&file).context(DefaultsSnafu),
    }
}
