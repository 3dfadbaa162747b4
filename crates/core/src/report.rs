//! The accumulated resolution report.
//!
//! Scan- and traversal-level problems are collected here instead of being
//! raised as control flow, so one bad archive never prevents diagnosing the
//! rest of the graph. The report exists whether or not a launch plan could
//! be built, and a failed launch prints it before exiting.

use serde::Serialize;
use std::fmt;

/// An archive that could not be opened or decoded. Skipped, never fatal
/// for the scan as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnreadableArtifact {
    pub path: String,
    pub reason: String,
}

/// The same class supplied by more than one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderConflict {
    pub class: String,
    /// Providing artifact paths in search-path order.
    pub providers: Vec<String>,
}

/// Two artifacts claiming the same module name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleNameConflict {
    pub name: String,
    pub artifacts: Vec<String>,
}

/// A referenced class with no provider on the search path. Non-fatal
/// during traversal: the reference may never execute at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedReference {
    pub class: String,
    /// Artifact whose classes first referenced it, when known.
    pub referenced_from: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreakReason {
    /// The chosen artifact's module is named in an already-included
    /// module's declared requires.
    DeclaredRequires,
    /// The chosen artifact comes first on the search path.
    SearchPathOrder,
}

/// A deterministic choice among multiple providers of one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TieBreak {
    pub class: String,
    pub chosen: String,
    pub rejected: Vec<String>,
    pub reason: TieBreakReason,
}

/// A declared-requires cycle among explicit modules, broken by demoting
/// every member but the earliest-discovered one to automatic treatment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleCycle {
    pub members: Vec<String>,
    pub demoted: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolutionReport {
    pub unreadable: Vec<UnreadableArtifact>,
    pub conflicts: Vec<ProviderConflict>,
    pub module_name_conflicts: Vec<ModuleNameConflict>,
    pub unresolved: Vec<UnresolvedReference>,
    pub tie_breaks: Vec<TieBreak>,
    pub cycles: Vec<ModuleCycle>,
}

impl ResolutionReport {
    pub fn is_clean(&self) -> bool {
        self.unreadable.is_empty()
            && self.conflicts.is_empty()
            && self.module_name_conflicts.is_empty()
            && self.unresolved.is_empty()
            && self.tie_breaks.is_empty()
            && self.cycles.is_empty()
    }

    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for ResolutionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return writeln!(f, "resolution report: clean");
        }
        writeln!(f, "resolution report:")?;
        for entry in &self.unreadable {
            writeln!(f, "  unreadable artifact {} ({})", entry.path, entry.reason)?;
        }
        for conflict in &self.conflicts {
            writeln!(
                f,
                "  duplicate provider for {}: {}",
                conflict.class,
                conflict.providers.join(", ")
            )?;
        }
        for conflict in &self.module_name_conflicts {
            writeln!(
                f,
                "  duplicate module name {}: {}",
                conflict.name,
                conflict.artifacts.join(", ")
            )?;
        }
        for unresolved in &self.unresolved {
            match &unresolved.referenced_from {
                Some(from) => writeln!(
                    f,
                    "  unresolved reference {} (referenced from {})",
                    unresolved.class, from
                )?,
                None => writeln!(f, "  unresolved reference {}", unresolved.class)?,
            }
        }
        for tie_break in &self.tie_breaks {
            let reason = match tie_break.reason {
                TieBreakReason::DeclaredRequires => "declared requires",
                TieBreakReason::SearchPathOrder => "search-path order",
            };
            writeln!(
                f,
                "  tie-break for {}: chose {} over {} ({})",
                tie_break.class,
                tie_break.chosen,
                tie_break.rejected.join(", "),
                reason
            )?;
        }
        for cycle in &self.cycles {
            writeln!(
                f,
                "  module cycle [{}]: demoted {} to automatic",
                cycle.members.join(" -> "),
                cycle.demoted.join(", ")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_report_renders_one_line() {
        let report = ResolutionReport::default();
        assert!(report.is_clean());
        assert_eq!(report.to_string(), "resolution report: clean\n");
    }

    #[test]
    fn entries_render_and_serialize() {
        let mut report = ResolutionReport::default();
        report.conflicts.push(ProviderConflict {
            class: "com.acme.Util".into(),
            providers: vec!["a.jar".into(), "b.jar".into()],
        });
        report.tie_breaks.push(TieBreak {
            class: "com.acme.Util".into(),
            chosen: "a.jar".into(),
            rejected: vec!["b.jar".into()],
            reason: TieBreakReason::SearchPathOrder,
        });

        let rendered = report.to_string();
        assert!(rendered.contains("duplicate provider for com.acme.Util: a.jar, b.jar"));
        assert!(rendered.contains("chose a.jar over b.jar (search-path order)"));

        let json = report.to_json().unwrap();
        assert!(json.contains("\"search_path_order\""));
    }
}
