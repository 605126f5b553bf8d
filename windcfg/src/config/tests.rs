//! Unit tests for configuration parsing and preset chains.

use std::path::Path;

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use serde_json::json;
use tempfile::TempDir;

use super::*;
use crate::WindError;

fn write(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, body).expect("write config file");
    path
}

fn load(path: &Path) -> Result<ProjectConfig> {
    load_config_file(path)
        .map_err(|err| anyhow!(err.to_string()))?
        .ok_or_else(|| anyhow!("config file missing"))
}

#[test]
fn missing_file_is_none() {
    let dir = TempDir::new().expect("tempdir");
    let loaded = load_config_file(&dir.path().join("windcfg.toml")).expect("missing file is fine");
    assert!(loaded.is_none());
}

#[rstest]
#[case::toml(
    "windcfg.toml",
    r#"
mode = "all"
content = ["./src/**/*.{rs,html,css}"]

[theme.extend.colors]
white = "var(--color-white)"

[theme.extend.colors.green]
500 = "var(--color-green-500)"
"#
)]
#[case::json5(
    "windcfg.json5",
    r#"{
  // trailing commas and comments are fine
  mode: 'all',
  content: ['./src/**/*.{rs,html,css}'],
  theme: {extend: {colors: {white: 'var(--color-white)', green: {'500': 'var(--color-green-500)'}}}},
}"#
)]
fn parses_each_format(#[case] name: &str, #[case] body: &str) -> Result<()> {
    let dir = TempDir::new()?;
    let config = load(&write(&dir, name, body))?;
    ensure!(config.mode.as_deref() == Some("all"));
    ensure!(config.content.patterns() == ["./src/**/*.{rs,html,css}"]);
    ensure!(config.theme.extend.leaf_count() == 2);
    ensure!(config.theme.overrides.is_empty());
    Ok(())
}

#[test]
fn malformed_toml_names_the_file() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write(&dir, "windcfg.toml", "content = [");
    let err = load_config_file(&path).expect_err("malformed toml");
    match &*err {
        WindError::File { path: reported, .. } => ensure!(reported.ends_with("windcfg.toml")),
        other => return Err(anyhow!("expected File error, got {other:?}")),
    }
    Ok(())
}

#[test]
fn theme_namespaces_outside_extend_are_overrides() -> Result<()> {
    let config = ProjectConfig::from_json(json!({
        "theme": {
            "colors": {"black": "#000"},
            "extend": {"spacing": {"18": "4.5rem"}}
        }
    }))
    .map_err(|err| anyhow!(err.to_string()))?;
    ensure!(config.theme.overrides.get("colors").is_some());
    ensure!(config.theme.overrides.get("extend").is_none());

    let base = TokenTree::from_json(json!({"colors": {"red": "#f00"}, "spacing": {"1": "0.25rem"}}))
        .map_err(|err| anyhow!(err.to_string()))?;
    let merged = config.theme_spec(base).merged();
    ensure!(merged.lookup("colors.red").is_none());
    ensure!(merged.lookup("colors.black").is_some());
    ensure!(merged.lookup("spacing.1").is_some());
    ensure!(merged.lookup("spacing.18").is_some());
    Ok(())
}

#[test]
fn presets_are_overlaid_by_the_including_file() -> Result<()> {
    let dir = TempDir::new()?;
    write(
        &dir,
        "base.toml",
        r##"
content = ["./base/**/*.rs"]
mode = "all"

[theme.extend.colors]
black = "#000"
white = "#fff"
"##,
    );
    let path = write(
        &dir,
        "windcfg.toml",
        r#"
presets = ["base.toml"]
content = ["./src/**/*.rs"]

[theme.extend.colors]
white = "var(--color-white)"
"#,
    );
    let config = load(&path)?;
    ensure!(config.content.patterns() == ["./src/**/*.rs"]);
    ensure!(config.mode.as_deref() == Some("all"));
    let colors = &config.theme.extend;
    ensure!(colors.lookup("colors.black").and_then(|v| v.as_leaf()) == Some("#000"));
    ensure!(colors.lookup("colors.white").and_then(|v| v.as_leaf()) == Some("var(--color-white)"));
    Ok(())
}

#[test]
fn later_presets_override_earlier_ones() -> Result<()> {
    let dir = TempDir::new()?;
    write(&dir, "one.json", r#"{"mode": "one"}"#);
    write(&dir, "two.json", r#"{"mode": "two"}"#);
    let path = write(&dir, "windcfg.json", r#"{"presets": ["one.json", "two.json"]}"#);
    ensure!(load(&path)?.mode.as_deref() == Some("two"));
    Ok(())
}

#[rstest]
#[case::self_reference(&[("a.toml", "presets = [\"a.toml\"]")], "a.toml")]
#[case::mutual(
    &[("a.toml", "presets = [\"b.toml\"]"), ("b.toml", "presets = [\"a.toml\"]")],
    "a.toml",
)]
fn preset_cycles_are_rejected(#[case] files: &[(&str, &str)], #[case] entry: &str) -> Result<()> {
    let dir = TempDir::new()?;
    for (name, body) in files {
        write(&dir, name, body);
    }
    let err = load_config_file(&dir.path().join(entry)).expect_err("cycle detected");
    match &*err {
        WindError::CyclicPreset { cycle } => {
            ensure!(cycle.contains(" -> "));
            ensure!(cycle.ends_with(entry));
        }
        other => return Err(anyhow!("expected CyclicPreset, got {other:?}")),
    }
    Ok(())
}

#[test]
fn shared_presets_are_not_cycles() -> Result<()> {
    let dir = TempDir::new()?;
    write(&dir, "common.toml", "mode = \"all\"");
    write(&dir, "a.toml", "presets = [\"common.toml\"]");
    let path = write(&dir, "windcfg.toml", "presets = [\"a.toml\", \"common.toml\"]");
    ensure!(load(&path)?.mode.as_deref() == Some("all"));
    Ok(())
}

#[rstest]
#[case::missing_file("presets = [\"absent.toml\"]")]
#[case::not_an_array("presets = \"base.toml\"")]
#[case::empty_entry("presets = [\"\"]")]
fn bad_presets_are_file_errors(#[case] body: &str) {
    let dir = TempDir::new().expect("tempdir");
    let path = write(&dir, "windcfg.toml", body);
    let err = load_config_file(&path).expect_err("preset rejected");
    assert!(matches!(&*err, WindError::File { .. }), "unexpected error: {err:?}");
}

#[test]
fn non_string_theme_leaves_are_rejected() {
    let err = ProjectConfig::from_json(json!({"theme": {"extend": {"spacing": {"1": 4}}}}))
        .expect_err("numeric leaf rejected");
    assert!(matches!(&*err, WindError::Gathering(_)));
}

#[test]
fn merge_value_replaces_arrays_and_merges_objects() {
    let mut target = json!({"content": ["a"], "theme": {"extend": {"colors": {"a": "1"}}}});
    merge_value(
        &mut target,
        json!({"content": ["b"], "theme": {"extend": {"colors": {"b": "2"}}}}),
    );
    assert_eq!(
        target,
        json!({"content": ["b"], "theme": {"extend": {"colors": {"a": "1", "b": "2"}}}})
    );
}
