//! Integration tests for Settings loading.
//!
//! These tests run against temp directories only. Environment overrides live
//! in `config_env_test.rs`, a separate test binary, so setting `SYSTREE_*`
//! there cannot leak into the layering checks here.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use systree::config::{local_config_path, DisplayConfig, Settings};

#[test]
fn given_no_config_files_when_from_defaults_then_uses_compiled_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.display, DisplayConfig::default());
    assert!(settings.template_file.is_none());
}

#[test]
fn given_local_config_when_loading_then_overlays_defaults() {
    let dir = TempDir::new().unwrap();
    let path = local_config_path(dir.path());
    fs::write(
        &path,
        r#"
[display]
show_ids = true
show_kinds = false
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert!(settings.display.show_ids);
    assert!(!settings.display.show_kinds);
    // not specified: default kept
    assert!(!settings.display.show_attributes);
    assert!(!settings.display.show_all);
}

#[test]
fn given_relative_template_path_when_loading_then_resolves_against_config_dir() {
    let dir = TempDir::new().unwrap();
    let path = local_config_path(dir.path());
    fs::write(&path, "template_file = \"templates/pi.toml\"\n").unwrap();

    let settings = Settings::load(Some(dir.path())).unwrap();

    assert_eq!(
        settings.template_file,
        Some(dir.path().join("templates/pi.toml"))
    );
}

#[test]
fn given_absolute_template_path_when_loading_then_keeps_it() {
    let dir = TempDir::new().unwrap();
    let path = local_config_path(dir.path());
    fs::write(&path, "template_file = \"/opt/systree/pi.toml\"\n").unwrap();

    let settings = Settings::load(Some(dir.path())).unwrap();

    assert_eq!(settings.template_file, Some(PathBuf::from("/opt/systree/pi.toml")));
}

#[test]
fn given_local_dir_when_loading_layers_then_local_config_applies() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "[display]\nshow_attributes = true\n",
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert!(settings.display.show_attributes);
}

#[test]
fn given_broken_toml_when_loading_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = local_config_path(dir.path());
    fs::write(&path, "[display\nshow_ids = ").unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();

    assert!(err.to_string().starts_with("config error: parse"));
}

#[test]
fn given_settings_when_serializing_then_round_trips_through_toml() {
    let settings = Settings {
        template_file: Some(PathBuf::from("/tmp/t.toml")),
        display: DisplayConfig {
            show_ids: true,
            ..Default::default()
        },
    };
    let text = settings.to_toml().unwrap();
    assert!(text.contains("show_ids = true"));
    let parsed: Settings = toml::from_str(&text).unwrap();
    assert_eq!(parsed, settings);
}
