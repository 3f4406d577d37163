//! # File I/O Module
//!
//! Reading takeoff inputs and writing results:
//! - **Input documents**: steel catalog, beam specs and beam count manifest
//!   as three JSON files, or one `.tko.json` project bundle
//! - **Atomic writes**: write to `.tmp`, sync, rename, so an interrupted run
//!   never leaves a half-written result
//! - **Version validation**: bundles carry a schema version
//!
//! ## Example
//!
//! ```rust,no_run
//! use takeoff_core::calculations::calculate;
//! use takeoff_core::file_io::{load_inputs, save_table_csv, InputPaths};
//! use takeoff_core::report::ResultTable;
//! use std::path::Path;
//!
//! let project = load_inputs(&InputPaths::default())?;
//! let totals = calculate(&project)?;
//! let table = ResultTable::from_totals(&totals, &project.settings);
//! save_table_csv(&table, Path::new("output.csv"))?;
//! # Ok::<(), takeoff_core::errors::TakeoffError>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::beams::BeamCatalog;
use crate::errors::{TakeoffError, TakeoffResult};
use crate::manifest::BeamCountManifest;
use crate::materials::SteelCatalog;
use crate::project::{TakeoffProject, SCHEMA_VERSION};
use crate::report::{ResultTable, TakeoffReport};

/// Locations of the three input documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputPaths {
    pub steel: PathBuf,
    pub beams: PathBuf,
    pub counts: PathBuf,
}

impl Default for InputPaths {
    fn default() -> Self {
        InputPaths {
            steel: PathBuf::from("steel_data.json"),
            beams: PathBuf::from("beam_data.json"),
            counts: PathBuf::from("beam_count.json"),
        }
    }
}

fn read_to_string(path: &Path) -> TakeoffResult<String> {
    let mut file = File::open(path).map_err(|e| {
        TakeoffError::file_error("open", path.display().to_string(), e.to_string())
    })?;

    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        TakeoffError::file_error("read", path.display().to_string(), e.to_string())
    })?;
    Ok(contents)
}

/// Load and parse one JSON document.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> TakeoffResult<T> {
    let contents = read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| json_error(path, &e))
}

/// Missing required fields get their own variant; everything else is a parse error.
fn json_error(path: &Path, e: &serde_json::Error) -> TakeoffError {
    let message = e.to_string();
    let missing = message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next());
    match missing {
        Some(field) => TakeoffError::missing_field(format!(
            "{} (in {} at line {})",
            field,
            path.display(),
            e.line()
        )),
        None => TakeoffError::serialization(format!("Invalid JSON in {}: {}", path.display(), message)),
    }
}

/// Load the three input documents into a project with default settings.
///
/// The project is not validated here; see [`TakeoffProject::validate`].
pub fn load_inputs(paths: &InputPaths) -> TakeoffResult<TakeoffProject> {
    let steel: SteelCatalog = load_json(&paths.steel)?;
    let beams: BeamCatalog = load_json(&paths.beams)?;
    let counts: BeamCountManifest = load_json(&paths.counts)?;

    info!(
        bar_sizes = steel.len(),
        beam_types = beams.len(),
        instances = counts.instance_count(),
        "loaded takeoff inputs"
    );

    Ok(TakeoffProject::from_inputs(steel, beams, counts))
}

/// Write bytes with atomic semantics.
///
/// 1. Write to a temporary file next to the target
/// 2. Sync to disk (fsync)
/// 3. Rename over the target (atomic on most filesystems)
///
/// The temporary file is removed if any step after its creation fails.
fn write_atomic(path: &Path, bytes: &[u8]) -> TakeoffResult<()> {
    let tmp_path = tmp_path_for(path);

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        TakeoffError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    let written = write_and_sync(&mut tmp_file, &tmp_path, bytes);
    drop(tmp_file);

    let result = written.and_then(|()| {
        fs::rename(&tmp_path, path).map_err(|e| {
            TakeoffError::file_error("rename to final", path.display().to_string(), e.to_string())
        })
    });

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    debug!(path = %path.display(), bytes = bytes.len(), "wrote file");
    Ok(())
}

fn write_and_sync(file: &mut File, tmp_path: &Path, bytes: &[u8]) -> TakeoffResult<()> {
    file.write_all(bytes).map_err(|e| {
        TakeoffError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    file.sync_all().map_err(|e| {
        TakeoffError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })
}

/// Temp file path for an atomic write: `<name>.tmp` beside the target
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Save a project bundle.
pub fn save_project(project: &TakeoffProject, path: &Path) -> TakeoffResult<()> {
    let json = serde_json::to_string_pretty(project)
        .map_err(|e| TakeoffError::serialization(e.to_string()))?;
    write_atomic(path, json.as_bytes())
}

/// Load a project bundle.
///
/// # Returns
///
/// * `Ok(TakeoffProject)` - Successfully loaded project
/// * `Err(TakeoffError::VersionMismatch)` - File version is incompatible
/// * `Err(TakeoffError::MissingField)` - A required field is absent
/// * `Err(TakeoffError::SerializationError)` - Invalid JSON
/// * `Err(TakeoffError::FileError)` - I/O error
pub fn load_project(path: &Path) -> TakeoffResult<TakeoffProject> {
    let project: TakeoffProject = load_json(path)?;
    validate_version(&project.meta.version)?;
    Ok(project)
}

/// Save the result table as CSV.
pub fn save_table_csv(table: &ResultTable, path: &Path) -> TakeoffResult<()> {
    let mut buf = Vec::new();
    table.write_csv(&mut buf)?;
    write_atomic(path, &buf)
}

/// Save the full report as pretty JSON.
pub fn save_report_json(report: &TakeoffReport, path: &Path) -> TakeoffResult<()> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| TakeoffError::serialization(e.to_string()))?;
    write_atomic(path, json.as_bytes())
}

/// Validate that a file version is compatible with the current schema.
fn validate_version(file_version: &str) -> TakeoffResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    let mismatch = || TakeoffError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // For 0.x versions, a newer minor version is not readable
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}
