//! CLI for the imgstash file-transfer helpers.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use imgstash_core::config;
use std::path::PathBuf;

use commands::{run_completions, run_du, run_format, run_import, run_new_file, run_save};

/// Top-level CLI for imgstash.
#[derive(Debug, Parser)]
#[command(name = "imgstash")]
#[command(about = "imgstash: save remote images and local streams into timestamped files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a remote image to a local path (an existing file is replaced).
    Save {
        /// http(s) or file:// link of the image.
        url: String,
        /// Destination file path.
        dest: PathBuf,
        /// Display title for the resource (logged only).
        #[arg(long)]
        title: Option<String>,
        /// Do not notify the media indexer after saving.
        #[arg(long)]
        no_notify: bool,
    },

    /// Copy a local file or file:// URI into a new timestamped file in the output directory.
    Import {
        /// Content id: a path or file:// URI.
        id: String,
        /// Do not notify the media indexer after importing.
        #[arg(long)]
        no_notify: bool,
    },

    /// Allocate an empty timestamped file in the output directory and print its path.
    NewFile,

    /// Show the total size of a directory's direct entries.
    Du {
        /// Directory to measure.
        dir: PathBuf,
        /// Use SI units (kB, MB, ...) instead of binary (KiB, MiB, ...).
        #[arg(long)]
        si: bool,
    },

    /// Render a byte count in human-readable form.
    Format {
        bytes: u64,
        /// Use SI units (kB, MB, ...) instead of binary (KiB, MiB, ...).
        #[arg(long)]
        si: bool,
    },

    /// Print a shell completion script to stdout.
    Completions {
        shell: Shell,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Save {
                url,
                dest,
                title,
                no_notify,
            } => run_save(&load_config()?, &url, &dest, title, !no_notify)?,
            CliCommand::Import { id, no_notify } => run_import(&load_config()?, &id, !no_notify)?,
            CliCommand::NewFile => run_new_file(&load_config()?)?,
            CliCommand::Du { dir, si } => run_du(&dir, si)?,
            CliCommand::Format { bytes, si } => run_format(bytes, si)?,
            CliCommand::Completions { shell } => run_completions(shell)?,
        }

        Ok(())
    }
}

fn load_config() -> Result<config::StashConfig> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests;
