//! Launches the JVM from a `LaunchPlan`.
//!
//! Command construction is a pure function of the plan so it can be
//! tested without a JVM on the machine. The child inherits stdio; its
//! exit code is propagated unchanged.

use crate::config::Diagnostics;
use crate::error::{LaunchError, Result};
use crate::plan::{DelegationStrategy, LaunchPlan};
use crate::resolver::ResolutionEvent;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

pub struct Launcher {
    java: PathBuf,
    diagnostics: Diagnostics,
}

impl Launcher {
    pub fn new(java: PathBuf, diagnostics: Diagnostics) -> Self {
        Self { java, diagnostics }
    }

    /// Uses `$JAVA_HOME/bin/java` when set, else `java` from `PATH`.
    pub fn from_env(diagnostics: Diagnostics) -> Self {
        let java = match std::env::var_os("JAVA_HOME") {
            Some(home) => PathBuf::from(home).join("bin").join("java"),
            None => PathBuf::from("java"),
        };
        Self::new(java, diagnostics)
    }

    /// Builds the `java` invocation for a plan.
    pub fn command(&self, plan: &LaunchPlan) -> Command {
        let mut command = Command::new(&self.java);
        let entries = join_entries(plan);
        match plan.delegation {
            DelegationStrategy::ModulePath => {
                let roots: Vec<&str> = plan.modules.iter().map(|m| m.name.as_str()).collect();
                command
                    .arg("--module-path")
                    .arg(entries)
                    // Without explicit roots the platform only resolves
                    // modules reachable via declared requires.
                    .arg("--add-modules")
                    .arg(roots.join(","))
                    .arg("-m")
                    .arg(format!("{}/{}", plan.entry_module, plan.entry_point));
            }
            DelegationStrategy::ClassPath => {
                command.arg("-cp").arg(entries).arg(&plan.entry_point);
            }
        }
        command
    }

    /// Configures the loader per the plan and invokes the entry point.
    /// With diagnostics enabled, each resolution event is replayed as a
    /// `Found class` line on stdout before the child starts.
    pub fn launch(&self, plan: &LaunchPlan, events: &[ResolutionEvent]) -> Result<i32> {
        if self.diagnostics == Diagnostics::Emit {
            for event in events {
                if event.module.is_empty() {
                    println!("Found class '{}'", event.class);
                } else {
                    println!("Found class '{}' in module {}", event.class, event.module);
                }
            }
        }

        let mut command = self.command(plan);
        debug!("launching {:?}", command);
        let status = command.status().map_err(|e| {
            LaunchError::Launch(format!("failed to spawn {}: {e}", self.java.display()))
        })?;
        // Signal death carries no exit code.
        Ok(status.code().unwrap_or(-1))
    }
}

pub fn path_separator() -> &'static str {
    if cfg!(target_os = "windows") { ";" } else { ":" }
}

fn join_entries(plan: &LaunchPlan) -> String {
    let entries: Vec<String> = plan
        .modules
        .iter()
        .map(|m| m.path.display().to_string())
        .collect();
    entries.join(path_separator())
}
