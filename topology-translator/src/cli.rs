use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "topology-translator")]
#[command(about = "Translate NMWG control plane topology into NSI NML topology")]
pub struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence).
    #[arg(long, global = true)]
    pub debug: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Fetch, translate and publish the topology described by the configuration.
    Run(RunArgs),
    /// Translate a local NMWG file without network access.
    Convert(ConvertArgs),
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Base directory for relative paths in the configuration.
    #[arg(long, default_value = ".")]
    pub basedir: PathBuf,
    /// Configuration file, relative to the base directory unless absolute.
    #[arg(long, default_value = "config.toml")]
    pub config: PathBuf,
}

#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// NMWG topology file to translate.
    pub input: PathBuf,
    /// NML topology output file.
    #[arg(short, long)]
    pub output: PathBuf,
    /// Optional JSON file listing STP ids and their source link ids.
    #[arg(long)]
    pub mapping: Option<PathBuf>,
    /// Configuration supplying service definitions and peerings.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Document lifetime in seconds (defaults to the configured lifetime).
    #[arg(long)]
    pub lifetime: Option<u64>,
}
