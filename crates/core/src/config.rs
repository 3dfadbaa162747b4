use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Whether the launcher prints per-class resolution diagnostics
/// (`Found class 'X' in module Y`) to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Diagnostics {
    Emit,
    #[default]
    Silent,
}

impl FromStr for Diagnostics {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "emit" => Ok(Diagnostics::Emit),
            "silent" => Ok(Diagnostics::Silent),
            other => Err(format!("unknown diagnostics mode '{other}' (emit|silent)")),
        }
    }
}

/// How duplicate-provider and duplicate-module-name conflicts are handled.
/// `Strict` aborts resolution on any conflict; `Permissive` applies the
/// deterministic tie-break and records the decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictPolicy {
    Strict,
    #[default]
    Permissive,
}

impl FromStr for ConflictPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "strict" => Ok(ConflictPolicy::Strict),
            "permissive" => Ok(ConflictPolicy::Permissive),
            other => Err(format!(
                "unknown conflict policy '{other}' (strict|permissive)"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    pub diagnostics: Diagnostics,
    /// Overall scan + resolution budget in milliseconds. Absent = unbounded.
    pub timeout_millis: Option<u64>,
    pub conflict_policy: ConflictPolicy,
}

impl LaunchConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_millis.map(Duration::from_millis)
    }
}
