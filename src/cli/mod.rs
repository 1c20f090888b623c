//! Command-line interface definitions for the `lookout` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page.

use clap::Parser;

/// Top-level CLI for the `lookout` binary.
#[derive(Debug, Parser)]
#[command(
    name = "lookout",
    about = "Resolve abbreviated catalogue names and wait for servers to settle",
    arg_required_else_help = true
)]
pub(crate) enum Cli {
    /// Resolve a query against a local JSON catalogue.
    #[command(name = "match", about = "Resolve a query against a local JSON catalogue")]
    Match(MatchCommand),
    /// Resolve an OS image label against the Scaleway catalogue.
    #[command(name = "image", about = "Resolve an OS image label on Scaleway")]
    Image(ImageCommand),
    /// Wait for a Scaleway server to reach a state.
    #[command(name = "wait", about = "Wait for a Scaleway server to reach a state")]
    Wait(WaitCommand),
}

/// Arguments for the `lookout match` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct MatchCommand {
    /// JSON file holding an array of `{ "name": ..., "id": ... }` entries.
    #[arg(long, value_name = "FILE")]
    pub(crate) catalog: String,
    /// Require the whole name to match instead of a substring.
    #[arg(long)]
    pub(crate) exact: bool,
    /// Text to look for; matching ignores ASCII case.
    #[arg(value_name = "QUERY")]
    pub(crate) query: String,
}

/// Arguments for the `lookout image` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct ImageCommand {
    /// Image label or fragment, for example `ubuntu` or `noble`.
    #[arg(value_name = "LABEL")]
    pub(crate) label: String,
}

/// Arguments for the `lookout wait` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct WaitCommand {
    /// State to wait for.
    #[arg(long, default_value = "running", value_name = "STATE")]
    pub(crate) target: String,
    /// Override the configured polling interval, in seconds.
    #[arg(long, value_name = "SECS")]
    pub(crate) interval: Option<u64>,
    /// Override the configured polling budget, in seconds.
    #[arg(long, value_name = "SECS")]
    pub(crate) timeout: Option<u64>,
    /// Identifier of the server to watch.
    #[arg(value_name = "SERVER_ID")]
    pub(crate) server_id: String,
}
