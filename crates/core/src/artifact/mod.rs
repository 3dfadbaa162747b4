//! The scanned-artifact data model.
//!
//! Artifacts are owned by the scan output and live for one launch
//! invocation; every downstream component refers to them by `ArtifactId`,
//! an index into the search-path-ordered scan output.

pub mod classfile;
pub mod scanner;

use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Position of an artifact in the scan output. Ids are assigned in
/// search-path order, so comparing ids compares search-path positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ArtifactId(pub usize);

/// One binary archive on the search path, immutable once scanned.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub id: ArtifactId,
    pub path: PathBuf,
    pub classes: Vec<ClassEntry>,
    /// Non-class, non-descriptor entry names, in archive order.
    pub resources: Vec<String>,
    /// Explicit descriptor from `module-info.class`, or the synthesized
    /// automatic identity once module assignment has run.
    pub descriptor: Option<ModuleDescriptor>,
}

impl Artifact {
    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }

    pub fn module_name(&self) -> &str {
        self.descriptor.as_ref().map(|d| d.name.as_str()).unwrap_or("")
    }

    pub fn is_automatic(&self) -> bool {
        self.descriptor.as_ref().map(|d| d.automatic).unwrap_or(true)
    }

    /// Every package that contains at least one scanned class.
    pub fn packages(&self) -> BTreeSet<String> {
        self.classes
            .iter()
            .filter(|c| !c.package.is_empty())
            .map(|c| c.package.clone())
            .collect()
    }
}

/// One class found inside an artifact.
#[derive(Debug, Clone)]
pub struct ClassEntry {
    /// Fully-qualified binary name, e.g. `com.acme.Main`.
    pub name: String,
    /// Owning package, empty for the unnamed package.
    pub package: String,
    /// Back-reference to the owning artifact.
    pub artifact: ArtifactId,
    /// Class names mentioned in the constant pool. A conservative
    /// superset of the classes actually touched at runtime.
    pub references: Vec<String>,
}

impl ClassEntry {
    pub fn new(name: String, artifact: ArtifactId, references: Vec<String>) -> Self {
        let package = match name.rfind('.') {
            Some(idx) => name[..idx].to_string(),
            None => String::new(),
        };
        Self {
            name,
            package,
            artifact,
            references,
        }
    }
}

/// Module identity of an artifact, either read verbatim from
/// `module-info.class` or synthesized for an automatic module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleDescriptor {
    pub name: String,
    pub version: Option<String>,
    pub exports: BTreeSet<String>,
    /// Required module names. Always empty for automatic modules.
    pub requires: BTreeSet<String>,
    pub automatic: bool,
}

impl ModuleDescriptor {
    pub fn automatic(name: String, exports: BTreeSet<String>) -> Self {
        Self {
            name,
            version: None,
            exports,
            requires: BTreeSet::new(),
            automatic: true,
        }
    }
}
