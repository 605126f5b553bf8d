//! Loading configuration files and their `presets` chains.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use super::ProjectConfig;
use super::error::{invalid_data, not_found};
use super::merge::merge_value;
use super::parser::parse_config_by_format;
use crate::path::{canonicalise, normalise_key};
use crate::{WindError, WindResult, WindResultExt};

const PRESETS_KEY: &str = "presets";

/// Load a project configuration, selecting the parser by extension.
///
/// Presets named by the file are loaded first, relative to the file that
/// names them, and the file's own values are merged over them.
///
/// Returns `Ok(None)` if the file does not exist.
///
/// # Examples
///
/// ```rust,no_run
/// use std::path::Path;
/// use windcfg::load_config_file;
///
/// if let Some(config) = load_config_file(Path::new("windcfg.toml"))? {
///     println!("{} content patterns", config.content.len());
/// }
/// # Ok::<_, std::sync::Arc<windcfg::WindError>>(())
/// ```
///
/// # Errors
///
/// Returns a [`WindError`] if reading or parsing any file in the chain fails,
/// a preset is missing, presets form a cycle, or the merged document does
/// not describe a [`ProjectConfig`].
pub fn load_config_file(path: &Path) -> WindResult<Option<ProjectConfig>> {
    load_config_value(path)?
        .map(ProjectConfig::from_json)
        .transpose()
}

/// Load a configuration file and its presets as one merged JSON document.
pub(crate) fn load_config_value(path: &Path) -> WindResult<Option<Value>> {
    let mut visited = HashSet::new();
    let mut stack = Vec::new();
    with_cycle_detection(path, &mut visited, &mut stack, load_layered)
}

fn with_cycle_detection<T, F>(
    path: &Path,
    visited: &mut HashSet<String>,
    stack: &mut Vec<PathBuf>,
    operation: F,
) -> WindResult<Option<T>>
where
    F: FnOnce(&Path, &mut HashSet<String>, &mut Vec<PathBuf>) -> WindResult<T>,
{
    if !path.is_file() {
        return Ok(None);
    }
    let canonical = canonicalise(path)?;
    let key = normalise_key(&canonical);
    if !visited.insert(key.clone()) {
        let mut cycle: Vec<String> = stack.iter().map(|p| p.display().to_string()).collect();
        cycle.push(canonical.display().to_string());
        return Err(Arc::new(WindError::CyclicPreset {
            cycle: cycle.join(" -> "),
        }));
    }
    stack.push(canonical.clone());
    let result = operation(&canonical, visited, stack);
    visited.remove(&key);
    stack.pop();
    result.map(Some)
}

fn load_layered(
    canonical: &Path,
    visited: &mut HashSet<String>,
    stack: &mut Vec<PathBuf>,
) -> WindResult<Value> {
    let data = std::fs::read_to_string(canonical).map_err(|e| WindError::file_arc(canonical, e))?;
    let figment = parse_config_by_format(canonical, &data)?;
    let mut value: Value = figment.extract().into_wind()?;
    let presets = take_presets(&mut value, canonical)?;

    let mut merged = Value::Object(Map::new());
    for preset in presets {
        let preset_path = resolve_relative(canonical, &preset);
        debug!(preset = %preset_path.display(), from = %canonical.display(), "loading preset");
        let Some(layer) = with_cycle_detection(&preset_path, visited, stack, load_layered)? else {
            return Err(not_found(&preset_path, "preset file does not exist"));
        };
        merge_value(&mut merged, layer);
    }
    merge_value(&mut merged, value);
    Ok(merged)
}

/// Remove the `presets` key from `value`, returning the listed paths.
fn take_presets(value: &mut Value, path: &Path) -> WindResult<Vec<String>> {
    let Some(raw) = value
        .as_object_mut()
        .and_then(|map| map.remove(PRESETS_KEY))
    else {
        return Ok(Vec::new());
    };
    let Value::Array(entries) = raw else {
        return Err(invalid_data(path, "'presets' must be an array of paths"));
    };
    entries
        .into_iter()
        .map(|entry| match entry {
            Value::String(preset) if !preset.is_empty() => Ok(preset),
            _ => Err(invalid_data(path, "'presets' entries must be non-empty strings")),
        })
        .collect()
}

fn resolve_relative(current: &Path, preset: &str) -> PathBuf {
    let target = Path::new(preset);
    if target.is_absolute() {
        return target.to_path_buf();
    }
    current
        .parent()
        .map_or_else(|| target.to_path_buf(), |dir| dir.join(target))
}
