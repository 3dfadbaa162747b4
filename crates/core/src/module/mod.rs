//! Module identity synthesis.
//!
//! Artifacts without a `module-info.class` get an automatic module
//! identity derived from the archive file name: version suffix and
//! extension stripped, non-alphanumeric runs collapsed to a single dot.
//! Exports are every package that contains at least one scanned class;
//! automatic modules declare no requires.

use crate::artifact::{Artifact, ModuleDescriptor};
use crate::report::ModuleNameConflict;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

// First `-<digit>` segment and everything after it is a version suffix,
// matching the platform's automatic-module naming convention.
static VERSION_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"-(\d+(\.|$))").unwrap());
static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").unwrap());

/// Derives an automatic module name from an archive file name.
pub fn derive_module_name(file_name: &str) -> String {
    let stem = file_name
        .strip_suffix(".jar")
        .or_else(|| file_name.strip_suffix(".zip"))
        .unwrap_or(file_name);
    let unversioned = match VERSION_SUFFIX.find(stem) {
        Some(m) => &stem[..m.start()],
        None => stem,
    };
    NON_ALPHANUMERIC
        .replace_all(unversioned, ".")
        .trim_matches('.')
        .to_string()
}

/// Synthesizes the automatic descriptor for one artifact.
pub fn synthesize(artifact: &Artifact) -> ModuleDescriptor {
    let file_name = artifact
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");
    ModuleDescriptor::automatic(derive_module_name(file_name), artifact.packages())
}

/// Fills in missing descriptors and reports module-name collisions across
/// explicit and derived names alike. The first artifact keeps the name;
/// conflicts become fatal only if the resolver ends up needing both
/// claimants at once.
pub fn assign_modules(artifacts: &mut [Artifact]) -> Vec<ModuleNameConflict> {
    for artifact in artifacts.iter_mut() {
        if artifact.descriptor.is_none() {
            let descriptor = synthesize(artifact);
            debug!(
                "synthesized automatic module {} for {}",
                descriptor.name,
                artifact.path.display()
            );
            artifact.descriptor = Some(descriptor);
        }
    }

    let mut claimants: IndexMap<String, Vec<String>> = IndexMap::new();
    for artifact in artifacts.iter() {
        claimants
            .entry(artifact.module_name().to_string())
            .or_default()
            .push(artifact.display_path());
    }
    claimants
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .map(|(name, artifacts)| ModuleNameConflict { name, artifacts })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{ArtifactId, ClassEntry};
    use std::path::PathBuf;

    #[test]
    fn derivation_follows_automatic_module_rules() {
        assert_eq!(derive_module_name("javafx-base.jar"), "javafx.base");
        assert_eq!(derive_module_name("javafx-base-11.0.2.jar"), "javafx.base");
        assert_eq!(derive_module_name("commons-lang3-3.12.0.jar"), "commons.lang3");
        assert_eq!(derive_module_name("foo-bar-1.0-SNAPSHOT.jar"), "foo.bar");
        assert_eq!(derive_module_name("app.jar"), "app");
        assert_eq!(derive_module_name("--weird__name--.jar"), "weird.name");
    }

    fn plain_artifact(id: usize, path: &str, classes: &[&str]) -> Artifact {
        Artifact {
            id: ArtifactId(id),
            path: PathBuf::from(path),
            classes: classes
                .iter()
                .map(|c| ClassEntry::new(c.to_string(), ArtifactId(id), vec![]))
                .collect(),
            resources: vec![],
            descriptor: None,
        }
    }

    #[test]
    fn synthesized_descriptor_exports_all_packages_and_requires_nothing() {
        let artifact = plain_artifact(
            0,
            "/libs/acme-util-2.1.jar",
            &["com.acme.A", "com.acme.io.B"],
        );
        let descriptor = synthesize(&artifact);
        assert_eq!(descriptor.name, "acme.util");
        assert!(descriptor.automatic);
        assert!(descriptor.requires.is_empty());
        assert_eq!(
            descriptor.exports.iter().cloned().collect::<Vec<_>>(),
            vec!["com.acme".to_string(), "com.acme.io".to_string()]
        );
    }

    #[test]
    fn duplicate_derived_names_are_reported_not_fatal() {
        let mut artifacts = vec![
            plain_artifact(0, "/a/util-1.0.jar", &["com.a.X"]),
            plain_artifact(1, "/b/util-2.0.jar", &["com.b.Y"]),
        ];
        let conflicts = assign_modules(&mut artifacts);

        assert!(artifacts.iter().all(|a| a.descriptor.is_some()));
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].name, "util");
        assert_eq!(conflicts[0].artifacts.len(), 2);
    }

    #[test]
    fn explicit_descriptor_is_left_alone() {
        let mut artifacts = vec![plain_artifact(0, "/a/lib-1.0.jar", &["com.a.X"])];
        artifacts[0].descriptor = Some(ModuleDescriptor {
            name: "declared.lib".into(),
            version: Some("1.0".into()),
            exports: Default::default(),
            requires: Default::default(),
            automatic: false,
        });
        let conflicts = assign_modules(&mut artifacts);
        assert!(conflicts.is_empty());
        assert_eq!(artifacts[0].module_name(), "declared.lib");
    }
}
