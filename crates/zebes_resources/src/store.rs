//! Filesystem helpers shared by the managers.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;
use zebes_core::{Result, ZebesError};

pub fn generate_guid() -> String {
    Uuid::new_v4().to_string()
}

/// File name used by resources that are stored by name and id.
pub fn resource_file_name(name: &str, id: &str) -> String {
    format!("{name}-{id}.json")
}

/// Names become file names, so they may not carry path components.
pub fn check_resource_name(kind: &str, name: &str) -> Result<()> {
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(ZebesError::invalid_argument(format!(
            "{kind} name '{name}' may not contain '/', '\\' or '..'"
        )));
    }
    Ok(())
}

/// Delete `<old_name>-<id>.json` after a save wrote the resource under a
/// different name. Missing old files are fine.
pub fn remove_old_file_if_renamed(id: &str, old_name: &str, new_name: &str, dir: &Path) {
    if old_name == new_name || old_name.is_empty() {
        return;
    }
    let old_path = dir.join(resource_file_name(old_name, id));
    if old_path.exists() {
        match fs::remove_file(&old_path) {
            Ok(()) => log::info!("Removed renamed file {}", old_path.display()),
            Err(e) => log::warn!("Failed to remove {}: {e}", old_path.display()),
        }
    }
}

pub fn file_not_found(path: &Path) -> ZebesError {
    ZebesError::not_found(format!("File not found: {}", path.display()))
}

pub fn read_to_string(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(file_not_found(path));
    }
    fs::read_to_string(path)
        .map_err(|e| ZebesError::internal(format!("Failed to read {}: {e}", path.display())))
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|e| {
        ZebesError::internal(format!("JSON parsing error in {}: {e}", path.display()))
    })
}

/// Serialize with a 4-space indent.
pub fn to_json_string<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| ZebesError::internal(format!("JSON serialization error: {e}")))?;
    String::from_utf8(buf).map_err(|e| ZebesError::internal(format!("Invalid UTF-8: {e}")))
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let json = to_json_string(value)?;
    fs::write(path, json)
        .map_err(|e| ZebesError::internal(format!("Failed to write {}: {e}", path.display())))
}

pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .map_err(|e| ZebesError::internal(format!("Failed to create {}: {e}", dir.display())))
}

pub fn remove_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(file_not_found(path));
    }
    fs::remove_file(path)
        .map_err(|e| ZebesError::internal(format!("Failed to delete {}: {e}", path.display())))
}

/// Every `*.json` file directly inside `dir`, sorted by path.
pub fn list_json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| ZebesError::internal(format!("Failed to list {}: {e}", dir.display())))?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    format!("{digest:x}")
}

pub fn hash_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .map_err(|e| ZebesError::internal(format!("Failed to read {}: {e}", path.display())))?;
    Ok(hash_bytes(&bytes))
}
