//! Transitive dependency resolution.
//!
//! Breadth-first traversal over class references starting from the entry
//! point. Each class resolves through the class index; unambiguous
//! providers join the working set and their classes' references are
//! enqueued. Ambiguity goes through a deterministic tie-break that is a
//! pure function of search-path order and accumulated state, never of
//! scheduling. Missing providers are recorded and traversal continues:
//! the reference may be optional at runtime.

use crate::artifact::{Artifact, ArtifactId};
use crate::config::ConflictPolicy;
use crate::error::{LaunchError, Result};
use crate::index::ClassIndex;
use crate::report::{ResolutionReport, TieBreak, TieBreakReason, UnresolvedReference};
use crate::util::Deadline;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, trace};

/// Packages supplied by the JVM's platform layer. References into these
/// are neither expanded nor reported as unresolved.
const PLATFORM_PACKAGES: &[&str] = &[
    "java.", "javax.", "jdk.", "sun.", "com.sun.", "org.w3c.", "org.xml.",
];

pub fn is_platform_class(class: &str) -> bool {
    PLATFORM_PACKAGES.iter().any(|p| class.starts_with(p))
}

/// One successful (class, artifact) resolution, replayed by the launcher
/// as a `Found class 'X' in module Y` diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionEvent {
    pub class: String,
    pub artifact: ArtifactId,
    pub module: String,
}

/// Output of a traversal: the artifact working set in discovery order and
/// the artifact-level resolution graph. An edge A -> B is labeled with the
/// first class that pulled B in from A.
#[derive(Debug)]
pub struct Resolution {
    pub working_set: Vec<ArtifactId>,
    pub entry_artifact: Option<ArtifactId>,
    pub events: Vec<ResolutionEvent>,
    pub graph: DiGraph<ArtifactId, String>,
}

pub struct Resolver<'a> {
    artifacts: &'a [Artifact],
    index: &'a ClassIndex,
    policy: ConflictPolicy,
    deadline: Deadline,
}

impl<'a> Resolver<'a> {
    pub fn new(
        artifacts: &'a [Artifact],
        index: &'a ClassIndex,
        policy: ConflictPolicy,
        deadline: Deadline,
    ) -> Self {
        Self {
            artifacts,
            index,
            policy,
            deadline,
        }
    }

    pub fn resolve(&self, entry_point: &str, report: &mut ResolutionReport) -> Result<Resolution> {
        if self.policy == ConflictPolicy::Strict {
            if let Some(conflict) = report.conflicts.first() {
                return Err(LaunchError::DuplicateProvider(conflict.class.clone()));
            }
        }

        let mut resolution = Resolution {
            working_set: Vec::new(),
            entry_artifact: None,
            events: Vec::new(),
            graph: DiGraph::new(),
        };
        let mut nodes: HashMap<ArtifactId, NodeIndex> = HashMap::new();
        let mut in_set: HashSet<ArtifactId> = HashSet::new();
        let mut module_names: HashMap<String, ArtifactId> = HashMap::new();
        // Union of declared requires over the working set, feeding the
        // tie-break's first preference.
        let mut required_names: HashSet<String> = HashSet::new();
        let mut seen_classes: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<(String, Option<ArtifactId>)> = VecDeque::new();
        queue.push_back((entry_point.to_string(), None));

        while let Some((class, origin)) = queue.pop_front() {
            if self.deadline.expired() {
                return Err(LaunchError::ResolutionTimeout(self.deadline.budget()));
            }
            if !seen_classes.insert(class.clone()) || is_platform_class(&class) {
                continue;
            }

            let providers = self.index.lookup(&class);
            if providers.is_empty() {
                report.unresolved.push(UnresolvedReference {
                    class: class.clone(),
                    referenced_from: origin.map(|id| self.artifacts[id.0].display_path()),
                });
                continue;
            }

            let chosen = if providers.len() == 1 {
                providers[0]
            } else {
                self.tie_break(&class, providers, &required_names, report)
            };
            let provider = &self.artifacts[chosen.0];
            trace!("resolved {} to {}", class, provider.path.display());

            resolution.events.push(ResolutionEvent {
                class: class.clone(),
                artifact: chosen,
                module: provider.module_name().to_string(),
            });
            if class == entry_point {
                resolution.entry_artifact = Some(chosen);
            }

            if let Some(origin) = origin {
                if origin != chosen {
                    let from = *nodes
                        .entry(origin)
                        .or_insert_with(|| resolution.graph.add_node(origin));
                    let to = *nodes
                        .entry(chosen)
                        .or_insert_with(|| resolution.graph.add_node(chosen));
                    if resolution.graph.find_edge(from, to).is_none() {
                        resolution.graph.add_edge(from, to, class.clone());
                    }
                }
            }

            if in_set.insert(chosen) {
                if let Some(&holder) = module_names.get(provider.module_name()) {
                    if self.policy == ConflictPolicy::Strict && holder != chosen {
                        return Err(LaunchError::DuplicateModuleName(
                            provider.module_name().to_string(),
                        ));
                    }
                } else {
                    module_names.insert(provider.module_name().to_string(), chosen);
                }
                if let Some(descriptor) = &provider.descriptor {
                    required_names.extend(descriptor.requires.iter().cloned());
                }
                nodes
                    .entry(chosen)
                    .or_insert_with(|| resolution.graph.add_node(chosen));
                resolution.working_set.push(chosen);
                debug!(
                    "added {} (module {}) to the working set",
                    provider.path.display(),
                    provider.module_name()
                );
                for entry in &provider.classes {
                    for reference in &entry.references {
                        if !seen_classes.contains(reference) && !is_platform_class(reference) {
                            queue.push_back((reference.clone(), Some(chosen)));
                        }
                    }
                }
            }
        }

        Ok(resolution)
    }

    /// Deterministic choice among multiple providers: an artifact whose
    /// module is named in an already-included module's declared requires
    /// wins; otherwise the artifact earliest on the search path does.
    fn tie_break(
        &self,
        class: &str,
        providers: &[ArtifactId],
        required_names: &HashSet<String>,
        report: &mut ResolutionReport,
    ) -> ArtifactId {
        let preferred = providers
            .iter()
            .copied()
            .find(|id| required_names.contains(self.artifacts[id.0].module_name()));
        let (chosen, reason) = match preferred {
            Some(id) => (id, TieBreakReason::DeclaredRequires),
            None => (providers[0], TieBreakReason::SearchPathOrder),
        };
        report.tie_breaks.push(TieBreak {
            class: class.to_string(),
            chosen: self.artifacts[chosen.0].display_path(),
            rejected: providers
                .iter()
                .filter(|id| **id != chosen)
                .map(|id| self.artifacts[id.0].display_path())
                .collect(),
            reason,
        });
        chosen
    }
}
