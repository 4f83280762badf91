use crate::{AppError, config::Config};

use std::fs;

use voice_notes_core::{DEFAULT_DATE_FORMAT, DEFAULT_STORE_KEY};

/// WHAT: Loading from a missing path writes a default config there
/// WHY: First launch should leave an editable file behind
#[test]
fn given_missing_file_when_loaded_then_defaults_written() {
    // Given: A path that does not exist yet, in a missing subdirectory
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    // When: Loading
    let config = Config::load_from(&path).unwrap();

    // Then: Defaults are returned and persisted without temp leftovers
    assert_eq!(config.storage.key, DEFAULT_STORE_KEY);
    assert_eq!(config.behaviour.date_format, DEFAULT_DATE_FORMAT);
    assert!(path.exists());
    assert!(!path.with_extension("toml.tmp").exists());
    let reloaded = Config::load_from(&path).unwrap();
    assert_eq!(reloaded.storage.data_dir, config.storage.data_dir);
}

/// WHAT: Sections and fields left out of the file take their defaults
/// WHY: Users only write the settings they change
#[test]
fn given_partial_file_when_loaded_then_missing_fields_defaulted() {
    // Given: A file that only overrides the store key and date format
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "[storage]\nkey = \"work-notes\"\n\n[behaviour]\ndate_format = \"%d/%m/%Y\"\n",
    )
    .unwrap();

    // When: Loading
    let config = Config::load_from(&path).unwrap();

    // Then: Overrides apply and everything else is default
    let defaults = Config::default();
    assert_eq!(config.storage.key, "work-notes");
    assert_eq!(config.storage.data_dir, defaults.storage.data_dir);
    assert_eq!(config.behaviour.date_format, "%d/%m/%Y");
    assert_eq!(config.audio.recordings_dir, defaults.audio.recordings_dir);
    assert_eq!(config.logging.filter, defaults.logging.filter);
}

/// WHAT: Malformed TOML is a config error, and the file is left alone
/// WHY: Silently replacing a broken file would lose the user's settings
#[test]
fn given_invalid_toml_when_loaded_then_config_error() {
    // Given: A file that is not TOML
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[storage\nkey = ").unwrap();

    // When: Loading
    let err = Config::load_from(&path).unwrap_err();

    // Then: ConfigError, original content untouched
    assert!(matches!(err, AppError::ConfigError { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), "[storage\nkey = ");
}

/// WHAT: Core options carry the configured key and date format
/// WHY: The store and session must see what the user configured
#[test]
fn given_config_when_notes_options_then_fields_mapped() {
    // Given: A config with custom values
    let mut config = Config::default();
    config.storage.key = "archive".to_string();
    config.behaviour.date_format = "%Y".to_string();

    // When: Deriving options
    let options = config.notes_options();

    // Then: Both are passed through
    assert_eq!(options.store_key, "archive");
    assert_eq!(options.date_format, "%Y");
}

/// WHAT: A saved config loads back with the same values
/// WHY: save_to is the only writer of the file
#[test]
fn given_saved_config_when_loaded_then_values_preserved() {
    // Given: A customised config saved to disk
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let mut config = Config::default();
    config.audio.recordings_dir = dir.path().join("clips");
    config.logging.filter = "voice_notes=trace".to_string();
    config.save_to(&path).unwrap();

    // When: Loading it back
    let loaded = Config::load_from(&path).unwrap();

    // Then: Custom values survive
    assert_eq!(loaded.audio.recordings_dir, dir.path().join("clips"));
    assert_eq!(loaded.logging.filter, "voice_notes=trace");
}
