//! Class index: fully-qualified class name -> providing artifacts.
//!
//! Registration never fails: a class supplied by more than one artifact is
//! a `DuplicateProvider` conflict recorded alongside the index, and both
//! providers stay discoverable. Whether a conflict is fatal is decided at
//! resolution time by the conflict policy, not here.

use crate::artifact::{Artifact, ArtifactId};
use crate::report::ProviderConflict;
use indexmap::IndexMap;

#[derive(Debug, Default)]
pub struct ClassIndex {
    map: IndexMap<String, Vec<ArtifactId>>,
}

impl ClassIndex {
    /// Builds the index over scanned artifacts in search-path order,
    /// returning the conflict log alongside.
    pub fn build(artifacts: &[Artifact]) -> (Self, Vec<ProviderConflict>) {
        let mut index = Self::default();
        let mut conflicts = Vec::new();
        for artifact in artifacts {
            for class in &artifact.classes {
                index.register(&class.name, artifact.id, artifacts, &mut conflicts);
            }
        }
        (index, conflicts)
    }

    /// Inserts one mapping. The first registration of a (class, artifact)
    /// pair against an existing different provider appends that pair to the
    /// conflict log exactly once.
    pub fn register(
        &mut self,
        class: &str,
        artifact: ArtifactId,
        artifacts: &[Artifact],
        conflicts: &mut Vec<ProviderConflict>,
    ) {
        let providers = self.map.entry(class.to_string()).or_default();
        if providers.contains(&artifact) {
            return;
        }
        providers.push(artifact);
        if providers.len() == 2 {
            conflicts.push(ProviderConflict {
                class: class.to_string(),
                providers: providers
                    .iter()
                    .map(|id| artifacts[id.0].display_path())
                    .collect(),
            });
        } else if providers.len() > 2 {
            // Third and later providers extend the existing entry rather
            // than producing one conflict per pair permutation.
            if let Some(conflict) = conflicts.iter_mut().find(|c| c.class == class) {
                conflict.providers.push(artifacts[artifact.0].display_path());
            }
        }
    }

    /// Providers of a class, in search-path order. Empty when unknown.
    pub fn lookup(&self, class: &str) -> &[ArtifactId] {
        self.map.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
