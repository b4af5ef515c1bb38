//! Tests for engine settings persistence
//!
//! Tests cover:
//! - Default settings values
//! - Serialization/deserialization
//! - Settings roundtrip through a file
//! - Sanitizing out-of-range values

use wellview::navigation::ResolutionMode;
use wellview::settings::{EngineSettings, SettingsError};

use crate::common::temp_path;

// ============================================
// Default Settings Tests
// ============================================

#[test]
fn test_settings_defaults() {
    let settings = EngineSettings::default();
    assert_eq!(settings.version, 1);
    assert_eq!(settings.target_points, 1500);
    assert_eq!(settings.high_res_ratio, 0.1);
    assert_eq!(settings.large_export_threshold, 50_000);
    assert_eq!(settings.navigation_overlap, 0.1);
    assert_eq!(settings.default_mode, ResolutionMode::Full);
    assert!(settings.anchor_to_latest);
}

#[test]
fn test_settings_path_is_json() {
    if let Some(path) = EngineSettings::get_settings_path() {
        assert!(path.ends_with("settings.json"));
    }
}

// ============================================
// Serialization Tests
// ============================================

#[test]
fn test_settings_deserialize_empty_object() {
    let settings: EngineSettings = serde_json::from_str("{}").unwrap();
    assert_eq!(settings, EngineSettings::default());
}

#[test]
fn test_settings_ignore_unknown_fields() {
    let settings: EngineSettings =
        serde_json::from_str(r#"{"target_points": 900, "theme": "dark"}"#).unwrap();
    assert_eq!(settings.target_points, 900);
}

#[test]
fn test_settings_reject_unknown_mode() {
    let result = serde_json::from_str::<EngineSettings>(r#"{"default_mode": "decade"}"#);
    assert!(result.is_err());
}

// ============================================
// File Roundtrip Tests
// ============================================

#[test]
fn test_settings_file_roundtrip() {
    let path = temp_path("roundtrip/settings.json");
    let settings = EngineSettings {
        target_points: 600,
        default_mode: ResolutionMode::OneMonth,
        anchor_to_latest: false,
        ..EngineSettings::default()
    };

    settings.save_to(&path).unwrap();
    let loaded = EngineSettings::load_from(&path).unwrap();
    assert_eq!(loaded, settings);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_load_from_sanitizes() {
    let path = temp_path("sanitize/settings.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, r#"{"navigation_overlap": -0.5, "zoom_out_factor": 0.8}"#).unwrap();

    let loaded = EngineSettings::load_from(&path).unwrap();
    assert_eq!(loaded.navigation_overlap, 0.1);
    assert_eq!(loaded.zoom_out_factor, 1.1);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_load_from_errors() {
    let missing = temp_path("missing/does-not-exist.json");
    assert!(matches!(
        EngineSettings::load_from(&missing),
        Err(SettingsError::Io(_))
    ));

    let path = temp_path("garbage/settings.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "not json").unwrap();
    assert!(matches!(
        EngineSettings::load_from(&path),
        Err(SettingsError::Parse(_))
    ));

    let _ = std::fs::remove_file(&path);
}
