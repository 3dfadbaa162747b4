//! Minimal class-file reads.
//!
//! Only the pieces the resolution engine needs are decoded: the class's own
//! binary name, the symbolic class references sitting in its constant pool,
//! and the `Module` attribute of `module-info.class`. Method bodies are
//! never touched.

use crate::artifact::ModuleDescriptor;
use ristretto_classfile::attributes::Attribute;
use ristretto_classfile::{ClassFile, Constant, ConstantPool};
use std::collections::BTreeSet;
use std::io::Cursor;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Name and raw reference list of a single class file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedClass {
    /// Fully-qualified binary name, dotted form.
    pub name: String,
    /// Referenced class names from the constant pool, dotted form,
    /// de-duplicated, in pool order. Excludes the class itself.
    pub references: Vec<String>,
}

pub fn parse_class(bytes: Vec<u8>) -> Result<ParsedClass, BoxError> {
    let class_file = ClassFile::from_bytes(&mut Cursor::new(bytes))
        .map_err(|e| format!("failed to parse class file: {e:?}"))?;
    let pool = &class_file.constant_pool;

    let name = class_name_at(pool, class_file.this_class)
        .ok_or("class file has no resolvable this_class entry")?;

    let mut seen = BTreeSet::new();
    let mut references = Vec::new();
    for constant in pool.iter() {
        let Constant::Class(name_index) = constant else {
            continue;
        };
        let Ok(internal) = pool.try_get_utf8(*name_index) else {
            continue;
        };
        let Some(reference) = normalize_reference(internal) else {
            continue;
        };
        if reference != name && seen.insert(reference.clone()) {
            references.push(reference);
        }
    }

    Ok(ParsedClass { name, references })
}

/// Reads the `Module` attribute of a `module-info.class` entry.
pub fn parse_module_info(bytes: Vec<u8>) -> Result<ModuleDescriptor, BoxError> {
    let class_file = ClassFile::from_bytes(&mut Cursor::new(bytes))
        .map_err(|e| format!("failed to parse module-info: {e:?}"))?;
    let pool = &class_file.constant_pool;

    for attribute in &class_file.attributes {
        let Attribute::Module {
            module_name_index,
            version_index,
            requires,
            exports,
            ..
        } = attribute
        else {
            continue;
        };

        let name = module_name_at(pool, *module_name_index)
            .ok_or("Module attribute has no resolvable module name")?;
        let version = if *version_index != 0 {
            pool.try_get_utf8(*version_index).ok().map(|v| v.to_string())
        } else {
            None
        };
        let requires: BTreeSet<String> = requires
            .iter()
            .filter_map(|r| module_name_at(pool, r.index))
            .collect();
        let exports: BTreeSet<String> = exports
            .iter()
            .filter_map(|e| package_name_at(pool, e.index))
            .collect();

        return Ok(ModuleDescriptor {
            name,
            version,
            exports,
            requires,
            automatic: false,
        });
    }

    Err("module-info.class carries no Module attribute".into())
}

fn class_name_at(pool: &ConstantPool, index: u16) -> Option<String> {
    match pool.try_get(index).ok()? {
        Constant::Class(name_index) => {
            let internal = pool.try_get_utf8(*name_index).ok()?;
            Some(internal.replace('/', "."))
        }
        _ => None,
    }
}

fn module_name_at(pool: &ConstantPool, index: u16) -> Option<String> {
    match pool.try_get(index).ok()? {
        Constant::Module(name_index) => {
            Some(pool.try_get_utf8(*name_index).ok()?.to_string())
        }
        _ => None,
    }
}

fn package_name_at(pool: &ConstantPool, index: u16) -> Option<String> {
    match pool.try_get(index).ok()? {
        Constant::Package(name_index) => {
            Some(pool.try_get_utf8(*name_index).ok()?.replace('/', "."))
        }
        _ => None,
    }
}

/// Turns a constant-pool class reference into a dotted binary name.
/// Array references collapse to their element class; primitive arrays
/// reference no loadable class and yield `None`.
fn normalize_reference(internal: &str) -> Option<String> {
    let element = internal.trim_start_matches('[');
    if element.len() < internal.len() {
        // Array descriptor: only `L<name>;` elements name a class.
        let inner = element.strip_prefix('L')?.strip_suffix(';')?;
        return Some(inner.replace('/', "."));
    }
    Some(element.replace('/', "."))
}
