//! The per-invocation launch session.
//!
//! One `LaunchSession` owns one scan, one class index and one resolution;
//! nothing is shared across launches, so repeated or concurrent launches
//! in the same process cannot contaminate each other. The report is
//! produced whether or not a plan could be built.

use crate::artifact::{Artifact, scanner};
use crate::config::LaunchConfig;
use crate::error::Result;
use crate::index::ClassIndex;
use crate::module;
use crate::plan::{self, LaunchPlan};
use crate::report::ResolutionReport;
use crate::resolver::{Resolution, Resolver};
use crate::util::Deadline;
use std::path::PathBuf;
use tracing::{debug, info};

pub struct LaunchSession {
    search_path: Vec<PathBuf>,
    entry_point: String,
    config: LaunchConfig,
}

/// Everything a successful resolution produces.
#[derive(Debug)]
pub struct Resolved {
    pub artifacts: Vec<Artifact>,
    pub resolution: Resolution,
    pub plan: LaunchPlan,
}

/// Report plus outcome. The report is always present; `resolved` carries
/// the abort cause when no plan could be constructed.
pub struct ResolveOutcome {
    pub report: ResolutionReport,
    pub resolved: Result<Resolved>,
}

impl LaunchSession {
    pub fn new(
        search_path: Vec<PathBuf>,
        entry_point: impl Into<String>,
        config: LaunchConfig,
    ) -> Self {
        Self {
            search_path,
            entry_point: entry_point.into(),
            config,
        }
    }

    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    /// Scan -> synthesize -> index -> resolve -> plan.
    pub fn resolve(&self) -> ResolveOutcome {
        let mut report = ResolutionReport::default();
        let resolved = self.resolve_inner(&mut report);
        ResolveOutcome { report, resolved }
    }

    fn resolve_inner(&self, report: &mut ResolutionReport) -> Result<Resolved> {
        let deadline = Deadline::from_timeout(self.config.timeout());

        let mut artifacts = scanner::scan_search_path(&self.search_path, &deadline, report)?;
        report.module_name_conflicts = module::assign_modules(&mut artifacts);

        let (index, conflicts) = ClassIndex::build(&artifacts);
        report.conflicts = conflicts;
        debug!(
            "indexed {} classes across {} artifacts",
            index.len(),
            artifacts.len()
        );

        let resolver = Resolver::new(
            &artifacts,
            &index,
            self.config.conflict_policy,
            deadline,
        );
        let resolution = resolver.resolve(&self.entry_point, report)?;
        let plan = plan::build(&self.entry_point, &artifacts, &resolution, report)?;
        info!(
            "resolved {} into {} modules (entry module {})",
            self.entry_point,
            plan.modules.len(),
            plan.entry_module
        );

        Ok(Resolved {
            artifacts,
            resolution,
            plan,
        })
    }
}
