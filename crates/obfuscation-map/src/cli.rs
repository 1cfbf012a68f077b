//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Compose and normalize source maps of obfuscated bundles.
#[derive(Debug, Parser)]
#[command(name = "obfuscation-map")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compose an original → intermediate map with an intermediate → final map
    Compose {
        /// Map from the original source to the intermediate code (standard or raw bundler map)
        #[arg(long)]
        first: Utf8PathBuf,

        /// Map from the intermediate code to the final output
        #[arg(long)]
        second: Utf8PathBuf,

        /// Name of the final output file
        #[arg(long)]
        file: String,

        /// Source name used when the first map is a raw bundler map
        #[arg(long = "source-name")]
        source_name: Option<String>,

        /// Path to the original source text, embedded as sourcesContent
        #[arg(long)]
        original: Option<Utf8PathBuf>,

        /// Write the result here instead of stdout
        #[arg(long, short)]
        out: Option<Utf8PathBuf>,
    },

    /// Convert a raw bundler map into a standard source map
    Normalize {
        /// The raw bundler map
        #[arg(long)]
        raw: Utf8PathBuf,

        /// Source name the mappings are attributed to
        #[arg(long)]
        filename: String,

        /// Path to the original source text, embedded as sourcesContent
        #[arg(long)]
        original: Option<Utf8PathBuf>,

        /// Write the result here instead of stdout
        #[arg(long, short)]
        out: Option<Utf8PathBuf>,
    },

    /// Print the original position of a generated position
    Lookup {
        /// The source map
        #[arg(long)]
        map: Utf8PathBuf,

        /// 1-based generated line
        #[arg(long)]
        line: u32,

        /// 0-based generated column
        #[arg(long, default_value_t = 0)]
        column: u32,
    },
}
