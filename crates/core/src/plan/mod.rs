//! Launch plan construction.
//!
//! Orders the resolved working set for the platform loader: explicit
//! modules first, in declared-requires topological order, then automatic
//! and demoted modules in search-path order. A declared-requires cycle
//! cannot be loaded as a true module layer, so every member except the
//! earliest-discovered one is demoted to automatic treatment and the
//! cycle is reported.

use crate::artifact::{Artifact, ArtifactId};
use crate::error::{LaunchError, Result};
use crate::report::{ModuleCycle, ResolutionReport};
use crate::resolver::Resolution;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DelegationStrategy {
    /// Layered module-path launch (`--module-path` + `-m`).
    ModulePath,
    /// Plain classpath launch; used for a single automatic artifact where
    /// a one-module layer would buy nothing.
    ClassPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKind {
    Explicit,
    Automatic,
    /// Explicit descriptor present, but demoted out of a requires cycle.
    Demoted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedModule {
    pub artifact: ArtifactId,
    pub path: PathBuf,
    pub name: String,
    pub kind: ModuleKind,
}

/// The fully resolved, ordered configuration handed to the launcher.
/// Produced once per launch; immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchPlan {
    pub entry_point: String,
    pub entry_module: String,
    pub delegation: DelegationStrategy,
    pub modules: Vec<PlannedModule>,
}

pub fn build(
    entry_point: &str,
    artifacts: &[Artifact],
    resolution: &Resolution,
    report: &mut ResolutionReport,
) -> Result<LaunchPlan> {
    let entry_artifact = resolution
        .entry_artifact
        .ok_or_else(|| LaunchError::PlanConstruction(entry_point.to_string()))?;

    let discovery_rank: HashMap<ArtifactId, usize> = resolution
        .working_set
        .iter()
        .enumerate()
        .map(|(rank, id)| (*id, rank))
        .collect();

    let explicit: Vec<ArtifactId> = resolution
        .working_set
        .iter()
        .copied()
        .filter(|id| !artifacts[id.0].is_automatic())
        .collect();

    let demoted = demote_cycles(&explicit, artifacts, &discovery_rank, report);
    let ordered_explicit = requires_order(
        explicit.iter().copied().filter(|id| !demoted.contains(id)),
        artifacts,
    );

    let mut modules: Vec<PlannedModule> = ordered_explicit
        .into_iter()
        .map(|id| planned(artifacts, id, ModuleKind::Explicit))
        .collect();

    let mut rest: Vec<ArtifactId> = resolution
        .working_set
        .iter()
        .copied()
        .filter(|id| artifacts[id.0].is_automatic() || demoted.contains(id))
        .collect();
    rest.sort();
    modules.extend(rest.into_iter().map(|id| {
        let kind = if demoted.contains(&id) {
            ModuleKind::Demoted
        } else {
            ModuleKind::Automatic
        };
        planned(artifacts, id, kind)
    }));

    let delegation = if modules.len() == 1 && artifacts[entry_artifact.0].is_automatic() {
        DelegationStrategy::ClassPath
    } else {
        DelegationStrategy::ModulePath
    };

    Ok(LaunchPlan {
        entry_point: entry_point.to_string(),
        entry_module: artifacts[entry_artifact.0].module_name().to_string(),
        delegation,
        modules,
    })
}

fn planned(artifacts: &[Artifact], id: ArtifactId, kind: ModuleKind) -> PlannedModule {
    let artifact = &artifacts[id.0];
    PlannedModule {
        artifact: id,
        path: artifact.path.clone(),
        name: artifact.module_name().to_string(),
        kind,
    }
}

/// Finds declared-requires cycles among the explicit modules and returns
/// the members to demote: everything in each cycle except its
/// earliest-discovered module.
fn demote_cycles(
    explicit: &[ArtifactId],
    artifacts: &[Artifact],
    discovery_rank: &HashMap<ArtifactId, usize>,
    report: &mut ResolutionReport,
) -> HashSet<ArtifactId> {
    let (graph, of_node) = requires_graph(explicit.iter().copied(), artifacts);
    let mut demoted = HashSet::new();

    for component in tarjan_scc(&graph) {
        if component.len() < 2 {
            continue;
        }
        let mut members: Vec<ArtifactId> = component.iter().map(|n| of_node[n]).collect();
        members.sort_by_key(|id| discovery_rank.get(id).copied().unwrap_or(usize::MAX));
        let kept = members[0];
        demoted.extend(members.iter().copied().filter(|id| *id != kept));
        report.cycles.push(ModuleCycle {
            members: members
                .iter()
                .map(|id| artifacts[id.0].module_name().to_string())
                .collect(),
            demoted: members
                .iter()
                .filter(|id| **id != kept)
                .map(|id| artifacts[id.0].module_name().to_string())
                .collect(),
        });
    }
    demoted
}

/// Topological order over declared requires: required modules first.
fn requires_order(
    explicit: impl Iterator<Item = ArtifactId>,
    artifacts: &[Artifact],
) -> Vec<ArtifactId> {
    let (graph, of_node) = requires_graph(explicit, artifacts);
    let order = toposort(&graph, None)
        .unwrap_or_else(|_| graph.node_indices().collect());
    order.into_iter().map(|n| of_node[&n]).collect()
}

/// Directed graph with an edge required -> requirer for every declared
/// requires that stays inside the given module set. Self-requires are
/// ignored.
fn requires_graph(
    explicit: impl Iterator<Item = ArtifactId>,
    artifacts: &[Artifact],
) -> (DiGraph<ArtifactId, ()>, HashMap<NodeIndex, ArtifactId>) {
    let mut graph = DiGraph::new();
    let mut node_of: HashMap<&str, (ArtifactId, NodeIndex)> = HashMap::new();
    let members: Vec<ArtifactId> = explicit.collect();
    for id in &members {
        let node = graph.add_node(*id);
        node_of.insert(artifacts[id.0].module_name(), (*id, node));
    }
    for id in &members {
        let Some(descriptor) = &artifacts[id.0].descriptor else {
            continue;
        };
        let (_, requirer) = node_of[artifacts[id.0].module_name()];
        for required in &descriptor.requires {
            if let Some((required_id, required_node)) = node_of.get(required.as_str()) {
                if *required_id != *id {
                    graph.add_edge(*required_node, requirer, ());
                }
            }
        }
    }
    let of_node = graph
        .node_indices()
        .map(|n| (n, graph[n]))
        .collect();
    (graph, of_node)
}
