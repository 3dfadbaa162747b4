#![allow(dead_code)]

//! Jar fixtures for the resolution tests: minimal but fully valid class
//! files and module descriptors, zipped into temporary archives.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

fn push_utf8(pool: &mut Vec<u8>, value: &str) {
    pool.push(1);
    pool.extend_from_slice(&(value.len() as u16).to_be_bytes());
    pool.extend_from_slice(value.as_bytes());
}

fn push_class(pool: &mut Vec<u8>, utf8_index: u16) {
    pool.push(7);
    pool.extend_from_slice(&utf8_index.to_be_bytes());
}

fn push_module_constant(pool: &mut Vec<u8>, utf8_index: u16) {
    pool.push(19);
    pool.extend_from_slice(&utf8_index.to_be_bytes());
}

fn push_package_constant(pool: &mut Vec<u8>, utf8_index: u16) {
    pool.push(20);
    pool.extend_from_slice(&utf8_index.to_be_bytes());
}

/// A minimal public class named `binary_name` (dotted), extending Object
/// and referencing `refs` (dotted) from its constant pool.
pub fn class_bytes(binary_name: &str, refs: &[&str]) -> Vec<u8> {
    let mut pool = Vec::new();
    let mut count: u16 = 0;
    let mut add_class = |pool: &mut Vec<u8>, dotted: &str| -> u16 {
        push_utf8(pool, &dotted.replace('.', "/"));
        count += 1;
        push_class(pool, count);
        count += 1;
        count
    };

    let this_class = add_class(&mut pool, binary_name);
    let super_class = add_class(&mut pool, "java.lang.Object");
    for r in refs {
        add_class(&mut pool, r);
    }

    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
    bytes.extend_from_slice(&0u16.to_be_bytes()); // minor
    bytes.extend_from_slice(&52u16.to_be_bytes()); // major, Java 8
    bytes.extend_from_slice(&(count + 1).to_be_bytes());
    bytes.extend_from_slice(&pool);
    bytes.extend_from_slice(&0x0021u16.to_be_bytes()); // PUBLIC | SUPER
    bytes.extend_from_slice(&this_class.to_be_bytes());
    bytes.extend_from_slice(&super_class.to_be_bytes());
    bytes.extend_from_slice(&0u16.to_be_bytes()); // interfaces
    bytes.extend_from_slice(&0u16.to_be_bytes()); // fields
    bytes.extend_from_slice(&0u16.to_be_bytes()); // methods
    bytes.extend_from_slice(&0u16.to_be_bytes()); // attributes
    bytes
}

/// A `module-info.class` declaring `module` with the given requires and
/// exported packages (dotted).
pub fn module_info_bytes(module: &str, requires: &[&str], exports: &[&str]) -> Vec<u8> {
    let mut pool = Vec::new();
    let mut count: u16 = 0;

    push_utf8(&mut pool, "module-info");
    count += 1;
    let this_utf8 = count;
    push_class(&mut pool, this_utf8);
    count += 1;
    let this_class = count;
    push_utf8(&mut pool, "Module");
    count += 1;
    let attr_name = count;
    push_utf8(&mut pool, module);
    count += 1;
    push_module_constant(&mut pool, count);
    count += 1;
    let module_entry = count;

    let mut require_entries = Vec::new();
    for r in requires {
        push_utf8(&mut pool, r);
        count += 1;
        push_module_constant(&mut pool, count);
        count += 1;
        require_entries.push(count);
    }
    let mut export_entries = Vec::new();
    for e in exports {
        push_utf8(&mut pool, &e.replace('.', "/"));
        count += 1;
        push_package_constant(&mut pool, count);
        count += 1;
        export_entries.push(count);
    }

    let mut body = Vec::new();
    body.extend_from_slice(&module_entry.to_be_bytes());
    body.extend_from_slice(&0u16.to_be_bytes()); // module_flags
    body.extend_from_slice(&0u16.to_be_bytes()); // module_version_index
    body.extend_from_slice(&(require_entries.len() as u16).to_be_bytes());
    for entry in &require_entries {
        body.extend_from_slice(&entry.to_be_bytes());
        body.extend_from_slice(&0u16.to_be_bytes()); // requires_flags
        body.extend_from_slice(&0u16.to_be_bytes()); // requires_version_index
    }
    body.extend_from_slice(&(export_entries.len() as u16).to_be_bytes());
    for entry in &export_entries {
        body.extend_from_slice(&entry.to_be_bytes());
        body.extend_from_slice(&0u16.to_be_bytes()); // exports_flags
        body.extend_from_slice(&0u16.to_be_bytes()); // exports_to_count
    }
    body.extend_from_slice(&0u16.to_be_bytes()); // opens_count
    body.extend_from_slice(&0u16.to_be_bytes()); // uses_count
    body.extend_from_slice(&0u16.to_be_bytes()); // provides_count

    let mut bytes = Vec::new();
    bytes.extend_from_slice(&0xCAFE_BABEu32.to_be_bytes());
    bytes.extend_from_slice(&0u16.to_be_bytes()); // minor
    bytes.extend_from_slice(&55u16.to_be_bytes()); // major, Java 11
    bytes.extend_from_slice(&(count + 1).to_be_bytes());
    bytes.extend_from_slice(&pool);
    bytes.extend_from_slice(&0x8000u16.to_be_bytes()); // ACC_MODULE
    bytes.extend_from_slice(&this_class.to_be_bytes());
    bytes.extend_from_slice(&0u16.to_be_bytes()); // super_class
    bytes.extend_from_slice(&0u16.to_be_bytes()); // interfaces
    bytes.extend_from_slice(&0u16.to_be_bytes()); // fields
    bytes.extend_from_slice(&0u16.to_be_bytes()); // methods
    bytes.extend_from_slice(&1u16.to_be_bytes()); // attributes
    bytes.extend_from_slice(&attr_name.to_be_bytes());
    bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
    bytes.extend_from_slice(&body);
    bytes
}

pub fn write_jar(path: &Path, entries: &[(String, Vec<u8>)]) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, bytes) in entries {
        zip.start_file(name.as_str(), options).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

/// A plain (automatic-module) jar holding `classes` as (name, refs) pairs.
pub fn jar(dir: &Path, file_name: &str, classes: &[(&str, &[&str])]) -> PathBuf {
    let path = dir.join(file_name);
    let entries: Vec<(String, Vec<u8>)> = classes
        .iter()
        .map(|(name, refs)| {
            (
                format!("{}.class", name.replace('.', "/")),
                class_bytes(name, refs),
            )
        })
        .collect();
    write_jar(&path, &entries);
    path
}

/// A modular jar: `module-info.class` plus the given classes.
pub fn modular_jar(
    dir: &Path,
    file_name: &str,
    module: &str,
    requires: &[&str],
    exports: &[&str],
    classes: &[(&str, &[&str])],
) -> PathBuf {
    let path = dir.join(file_name);
    let mut entries = vec![(
        "module-info.class".to_string(),
        module_info_bytes(module, requires, exports),
    )];
    for (name, refs) in classes {
        entries.push((
            format!("{}.class", name.replace('.', "/")),
            class_bytes(name, refs),
        ));
    }
    write_jar(&path, &entries);
    path
}
