//! Integration tests for configuration loading and graceful degradation
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate MVG_CONFIG or MVG_PEXELS_API_KEY are marked with
//! #[serial] so they run sequentially.

use mvg_common::config::{
    load_or_default, load_toml_config, resolve_config_path, resolve_pexels_api_key,
    write_toml_config, LoggingConfig, TomlConfig, CONFIG_ENV_VAR, PEXELS_KEY_ENV_VAR,
};
use mvg_common::params::{AnalysisParams, ClipParams};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_write_then_load_preserves_fields() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("config.toml");

    let config = TomlConfig {
        output_folder: Some(PathBuf::from("/renders")),
        pexels_api_key: Some("key123".to_string()),
        logging: LoggingConfig {
            level: "debug".to_string(),
        },
        analysis: AnalysisParams {
            segment_count: 12,
            ..Default::default()
        },
        clips: ClipParams {
            target_clip_duration: 4.0,
            ..Default::default()
        },
    };

    write_toml_config(&config, &target).unwrap();
    assert!(target.exists());
    assert!(!temp_dir.path().join("config.toml.tmp").exists());

    let loaded = load_toml_config(&target).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_invalid_params_rejected_on_load() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("bad.toml");
    std::fs::write(&target, "[analysis]\nsegment_count = 0\n").unwrap();

    assert!(load_toml_config(&target).is_err());
}

#[test]
fn test_mood_keywords_overridable() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("moods.toml");
    std::fs::write(
        &target,
        "[clips.mood_keywords]\nhappy = [\"confetti\", \"party\", \"smile\", \"summer\"]\n",
    )
    .unwrap();

    let loaded = load_toml_config(&target).unwrap();
    assert_eq!(loaded.clips.mood_keywords.happy[0], "confetti");
    // Untouched rows keep their defaults
    assert_eq!(loaded.clips.mood_keywords.sad[0], "rain");
}

#[test]
#[serial]
fn test_cli_path_beats_env() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/from-env.toml");
    let cli = PathBuf::from("/tmp/from-cli.toml");

    assert_eq!(resolve_config_path(Some(&cli)), Some(cli.clone()));
    assert_eq!(
        resolve_config_path(None),
        Some(PathBuf::from("/tmp/from-env.toml"))
    );

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_missing_config_file_degrades_to_defaults() {
    env::remove_var(CONFIG_ENV_VAR);
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("does-not-exist.toml");

    let config = load_or_default(Some(&missing));
    assert_eq!(config, TomlConfig::default());
}

#[test]
#[serial]
fn test_pexels_key_env_priority() {
    env::set_var(PEXELS_KEY_ENV_VAR, "env-key");
    let config = TomlConfig {
        pexels_api_key: Some("toml-key".to_string()),
        ..Default::default()
    };

    assert_eq!(resolve_pexels_api_key(&config).unwrap(), "env-key");

    env::remove_var(PEXELS_KEY_ENV_VAR);
    assert_eq!(resolve_pexels_api_key(&config).unwrap(), "toml-key");
}

#[test]
#[serial]
fn test_blank_pexels_key_is_not_configured() {
    env::set_var(PEXELS_KEY_ENV_VAR, "   ");
    let config = TomlConfig {
        pexels_api_key: Some(String::new()),
        ..Default::default()
    };

    assert!(resolve_pexels_api_key(&config).is_err());
    env::remove_var(PEXELS_KEY_ENV_VAR);
}
