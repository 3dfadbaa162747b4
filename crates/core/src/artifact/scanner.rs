//! Search-path scanner.
//!
//! Opens every candidate archive, classifies its entries and extracts
//! per-class metadata. Archives are independent, so they are scanned in
//! parallel; results are merged back in search-path order afterwards so
//! that artifact ids, conflict ordering and reports never depend on
//! scheduling.

use crate::artifact::classfile::{self, ParsedClass};
use crate::artifact::{Artifact, ArtifactId, ClassEntry, ModuleDescriptor};
use crate::error::{LaunchError, Result};
use crate::report::{ResolutionReport, UnreadableArtifact};
use crate::util::Deadline;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;
use zip::ZipArchive;

/// Raw per-archive scan result, before artifact ids exist.
struct ScannedArchive {
    path: PathBuf,
    classes: Vec<ParsedClass>,
    resources: Vec<String>,
    descriptor: Option<ModuleDescriptor>,
}

/// Scans an ordered search path into artifacts.
///
/// Unreadable archives are recorded in the report and skipped; whether a
/// missing artifact is fatal is the caller's decision once resolution has
/// run. Only an expired deadline aborts the scan as a whole.
pub fn scan_search_path(
    locations: &[PathBuf],
    deadline: &Deadline,
    report: &mut ResolutionReport,
) -> Result<Vec<Artifact>> {
    let archives = expand_locations(locations);
    debug!("scanning {} archives", archives.len());

    let scanned: Vec<std::result::Result<ScannedArchive, LaunchError>> = archives
        .par_iter()
        .map(|path| {
            if deadline.expired() {
                return Err(LaunchError::ResolutionTimeout(deadline.budget()));
            }
            scan_archive(path)
        })
        .collect();

    // Serialized merge in search-path order: ids and report entries come
    // out identical run-to-run regardless of worker scheduling.
    let mut artifacts = Vec::new();
    for result in scanned {
        match result {
            Ok(raw) => {
                let id = ArtifactId(artifacts.len());
                artifacts.push(into_artifact(id, raw));
            }
            Err(LaunchError::UnreadableArtifact { path, reason }) => {
                warn!("skipping unreadable artifact {}: {}", path.display(), reason);
                report.unreadable.push(UnreadableArtifact {
                    path: path.display().to_string(),
                    reason,
                });
            }
            Err(other) => return Err(other),
        }
    }
    Ok(artifacts)
}

/// A search-path location is either an archive or a directory of archives.
/// Directories expand to the `.jar` files beneath them, sorted, so the
/// effective search path stays deterministic.
fn expand_locations(locations: &[PathBuf]) -> Vec<PathBuf> {
    let mut archives = Vec::new();
    for location in locations {
        if location.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(location)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file() && is_archive(entry.path()))
                .map(|entry| entry.into_path())
                .collect();
            found.sort();
            archives.extend(found);
        } else {
            archives.push(location.clone());
        }
    }
    archives
}

fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jar") || ext.eq_ignore_ascii_case("zip"))
}

fn unreadable(path: &Path, reason: impl ToString) -> LaunchError {
    LaunchError::UnreadableArtifact {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    }
}

fn scan_archive(path: &Path) -> std::result::Result<ScannedArchive, LaunchError> {
    let file = File::open(path).map_err(|e| unreadable(path, e))?;
    let mut archive = ZipArchive::new(file).map_err(|e| unreadable(path, e))?;

    let mut classes = Vec::new();
    let mut resources = Vec::new();
    let mut descriptor = None;
    let mut seen_classes = HashSet::new();

    for i in 0..archive.len() {
        // A broken central-directory entry means the archive itself is
        // corrupt, not just one member.
        let mut entry = archive.by_index(i).map_err(|e| unreadable(path, e))?;
        if entry.is_dir() {
            continue;
        }
        let name = entry.name().to_string();

        if name == "module-info.class" {
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes).map_err(|e| unreadable(path, e))?;
            match classfile::parse_module_info(bytes) {
                Ok(parsed) => descriptor = Some(parsed),
                Err(e) => warn!("{}: ignoring malformed module-info: {}", path.display(), e),
            }
        } else if name.ends_with(".class")
            && !name.starts_with("META-INF/")
            && !name.ends_with("/module-info.class")
        {
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes).map_err(|e| unreadable(path, e))?;
            match classfile::parse_class(bytes) {
                Ok(parsed) => {
                    // A class name is registered at most once per artifact
                    // even if the archive carries duplicate entries.
                    if seen_classes.insert(parsed.name.clone()) {
                        classes.push(parsed);
                    }
                }
                Err(e) => warn!("{}: skipping malformed entry {}: {}", path.display(), name, e),
            }
        } else {
            resources.push(name);
        }
    }

    Ok(ScannedArchive {
        path: path.to_path_buf(),
        classes,
        resources,
        descriptor,
    })
}

fn into_artifact(id: ArtifactId, raw: ScannedArchive) -> Artifact {
    let classes = raw
        .classes
        .into_iter()
        .map(|parsed| ClassEntry::new(parsed.name, id, parsed.references))
        .collect();
    Artifact {
        id,
        path: raw.path,
        classes,
        resources: raw.resources,
        descriptor: raw.descriptor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::tempdir;

    fn resource_jar(path: &Path, entries: &[&str]) {
        let file = File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        for entry in entries {
            zip.start_file(*entry, options).unwrap();
            zip.write_all(b"payload").unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn unreadable_archive_is_reported_not_fatal() {
        let dir = tempdir().unwrap();
        let bogus = dir.path().join("broken.jar");
        std::fs::write(&bogus, b"this is not a zip").unwrap();

        let mut report = ResolutionReport::default();
        let artifacts =
            scan_search_path(&[bogus.clone()], &Deadline::unbounded(), &mut report).unwrap();

        assert!(artifacts.is_empty());
        assert_eq!(report.unreadable.len(), 1);
        assert_eq!(report.unreadable[0].path, bogus.display().to_string());
    }

    #[test]
    fn resources_are_classified_but_not_indexed() {
        let dir = tempdir().unwrap();
        let jar = dir.path().join("res.jar");
        resource_jar(&jar, &["application.properties", "icons/app.png"]);

        let mut report = ResolutionReport::default();
        let artifacts = scan_search_path(&[jar], &Deadline::unbounded(), &mut report).unwrap();

        assert_eq!(artifacts.len(), 1);
        assert!(artifacts[0].classes.is_empty());
        assert_eq!(
            artifacts[0].resources,
            vec!["application.properties".to_string(), "icons/app.png".to_string()]
        );
    }

    #[test]
    fn directories_expand_to_sorted_jars() {
        let dir = tempdir().unwrap();
        resource_jar(&dir.path().join("b.jar"), &[]);
        resource_jar(&dir.path().join("a.jar"), &[]);
        std::fs::write(dir.path().join("notes.txt"), b"skip me").unwrap();

        let mut report = ResolutionReport::default();
        let artifacts =
            scan_search_path(&[dir.path().to_path_buf()], &Deadline::unbounded(), &mut report)
                .unwrap();

        let names: Vec<String> = artifacts
            .iter()
            .map(|a| a.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.jar".to_string(), "b.jar".to_string()]);
    }

    #[test]
    fn expired_deadline_aborts_the_scan() {
        let dir = tempdir().unwrap();
        let jar = dir.path().join("slow.jar");
        resource_jar(&jar, &[]);

        let deadline = Deadline::from_timeout(Some(Duration::ZERO));
        let mut report = ResolutionReport::default();
        let err = scan_search_path(&[jar], &deadline, &mut report).unwrap_err();
        assert!(matches!(err, LaunchError::ResolutionTimeout(_)));
    }
}
