//! CLI definitions for launchkit.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// launchkit CLI.
#[derive(Parser)]
#[command(name = "launchkit")]
#[command(about = "Build launchd job descriptors and control launchd jobs")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: <config dir>/launchkit/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// List jobs
    List {
        /// Exact job label
        label: Option<String>,

        /// Regular expression matched against labels
        #[arg(long, conflicts_with = "label")]
        pattern: Option<String>,
    },

    /// Start a job
    Start { label: String },

    /// Stop a job
    Stop { label: String },

    /// Remove a job
    Remove { label: String },

    /// Stop then start a job
    Restart { label: String },

    /// Load a job definition
    Load(LoadArgs),

    /// Unload a job definition
    Unload(LoadArgs),

    /// Submit a job without writing a plist
    Submit {
        /// Job label
        #[arg(short, long)]
        label: String,

        /// Program to run
        #[arg(short, long)]
        program: String,

        /// Standard output path
        #[arg(short = 'o', long)]
        stdout: Option<PathBuf>,

        /// Standard error path
        #[arg(short = 'e', long)]
        stderr: Option<PathBuf>,

        /// Arguments passed to the program
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Show or set resource limits
    Limit {
        /// Limit kind (cpu, filesize, data, stack, core, rss, memlock, maxproc, maxfiles)
        kind: Option<String>,

        /// Soft limit (a number or "unlimited")
        soft: Option<String>,

        /// Hard limit (defaults to the soft limit)
        hard: Option<String>,
    },

    /// Show the manager's environment, or one variable
    Getenv { key: Option<String> },

    /// Set an environment variable in the manager
    Setenv { key: String, value: String },

    /// Unset an environment variable in the manager
    Unsetenv { key: String },

    /// Show or set the umask (octal)
    Umask { mask: Option<String> },

    /// Show the current manager's name, uid and pid
    Manager,

    /// Show resource usage
    Rusage {
        /// "self" or "children"
        #[arg(default_value = "self")]
        who: String,
    },

    /// Build a job descriptor and print it as an XML property list
    Plist(PlistArgs),
}

#[derive(Args)]
pub(crate) struct LoadArgs {
    /// Path to the plist (or directory of plists)
    pub path: PathBuf,

    /// Override the Disabled key on disk
    #[arg(short = 'w', long)]
    pub write: bool,

    /// Force loading even if the job is disabled
    #[arg(short = 'F', long)]
    pub force: bool,

    /// Session type (Aqua, LoginWindow, Background, StandardIO, System)
    #[arg(short = 'S', long)]
    pub session_type: Option<String>,

    /// Search domain (e.g. user, local, network, system)
    #[arg(short = 'D', long)]
    pub domain: Option<String>,
}

#[derive(Args)]
pub(crate) struct PlistArgs {
    /// Job label
    #[arg(long)]
    pub label: String,

    /// Program path
    #[arg(long)]
    pub program: Option<String>,

    /// Program argument (repeatable)
    #[arg(long = "arg")]
    pub args: Vec<String>,

    /// Start the job when it is loaded
    #[arg(long)]
    pub run_at_load: bool,

    /// Keep the job alive
    #[arg(long)]
    pub keep_alive: bool,

    /// Calendar interval such as `Hour=3,Weekday=sunday` (repeatable)
    #[arg(long)]
    pub calendar: Vec<String>,

    /// Run every N seconds
    #[arg(long)]
    pub start_interval: Option<u64>,

    /// Environment variable `KEY=VALUE` (repeatable)
    #[arg(long = "env")]
    pub env: Vec<String>,

    /// Working directory
    #[arg(long)]
    pub working_directory: Option<String>,

    /// Standard output path
    #[arg(long)]
    pub stdout_path: Option<String>,

    /// Standard error path
    #[arg(long)]
    pub stderr_path: Option<String>,

    /// Write the plist here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
