mod resolve;
mod run;

use clap::{Args, Parser, Subcommand};
use modlift_core::config::{ConflictPolicy, Diagnostics, LaunchConfig};
use modlift_core::launch::LaunchSession;
use std::path::PathBuf;

/// Exit code for failures of resolution or plan construction, distinct
/// from anything the launched program itself exits with.
pub const RESOLUTION_FAILURE: i32 = 2;

#[derive(Parser)]
#[command(
    name = "modlift",
    version,
    about = "Runs plain-archive applications under the JVM module system",
    long_about = "Modlift scans an ordered search path of archives, resolves the classes the \
                  entry point transitively needs, synthesizes automatic-module identities for \
                  archives without module metadata, and launches the JVM from the resulting \
                  module-path configuration without modifying the original artifacts."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve an entry point and launch it
    #[command(
        long_about = "Resolves the entry point against the search path and launches the JVM \
                      from the computed plan. The child's exit code is propagated unchanged; \
                      resolution failures exit 2 after printing the resolution report."
    )]
    Run {
        #[command(flatten)]
        args: LaunchArgs,
    },
    /// Resolve without launching, printing the plan and the report
    Resolve {
        #[command(flatten)]
        args: LaunchArgs,
        /// Render the resolution report as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
pub struct LaunchArgs {
    /// Fully-qualified entry-point class, e.g. com.acme.Main
    #[arg(value_name = "ENTRY_POINT")]
    pub entry_point: String,

    /// Archive or directory of archives, searched in order; repeatable
    #[arg(short = 'p', long = "search-path", value_name = "PATH", required = true)]
    pub search_path: Vec<PathBuf>,

    /// Emit a `Found class` diagnostic line per resolved class
    #[arg(long)]
    pub diagnostics: bool,

    /// Overall scan + resolution budget in milliseconds
    #[arg(long, value_name = "MILLIS")]
    pub timeout_millis: Option<u64>,

    /// strict aborts on any duplicate provider or duplicate module name;
    /// permissive applies the deterministic tie-break and records it
    #[arg(long, value_name = "POLICY", default_value = "permissive")]
    pub conflict_policy: ConflictPolicy,
}

impl LaunchArgs {
    fn config(&self) -> LaunchConfig {
        LaunchConfig {
            diagnostics: if self.diagnostics {
                Diagnostics::Emit
            } else {
                Diagnostics::Silent
            },
            timeout_millis: self.timeout_millis,
            conflict_policy: self.conflict_policy,
        }
    }

    fn session(&self) -> LaunchSession {
        LaunchSession::new(
            self.search_path.clone(),
            self.entry_point.clone(),
            self.config(),
        )
    }
}

pub fn run() -> i32 {
    let cli = Cli::parse();
    let _guard = modlift_core::logging::init_logging("cli", false);

    match cli.command {
        Commands::Run { args } => run::run(&args),
        Commands::Resolve { args, json } => resolve::run(&args, json),
    }
}
