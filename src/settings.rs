//! # Settings Store
//!
//! Persisted key/value settings shared by the HTTP handlers and the control
//! channel. Values live in a flat JSON object on disk:
//!
//! ```json
//! { "printerName": "POS_PRINTER", "paperWidth": 48 }
//! ```
//!
//! Every read goes to the file, so a save made by another process (the
//! `settings set` command next to a running relay) shows up on the next
//! request. A missing or corrupt file is treated as empty, so every read
//! falls back to its default and the process never fails on a settings
//! read. Writes rewrite the whole file via a temp file and rename.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::PrintBridgeError;

/// File name of the settings store inside the config directory
pub const SETTINGS_FILE: &str = "settings.json";

/// Key holding the selected printer name
pub const KEY_PRINTER_NAME: &str = "printerName";

/// Key holding the paper width in characters per line
pub const KEY_PAPER_WIDTH: &str = "paperWidth";

/// Characters per line on 80mm paper with the default font
pub const DEFAULT_PAPER_WIDTH: u32 = 48;

/// User-configurable printer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Printer (or device) to print on. Empty selects the backend's default.
    #[serde(default)]
    pub printer_name: String,
    /// Characters per line.
    #[serde(default = "default_paper_width")]
    pub paper_width: u32,
}

fn default_paper_width() -> u32 {
    DEFAULT_PAPER_WIDTH
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            printer_name: String::new(),
            paper_width: DEFAULT_PAPER_WIDTH,
        }
    }
}

impl Settings {
    /// Reject values that can never drive a printer.
    pub fn validate(&self) -> Result<(), PrintBridgeError> {
        if self.paper_width == 0 {
            return Err(PrintBridgeError::InvalidInput(
                "paperWidth must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Process-wide settings store backed by a JSON file.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl SettingsStore {
    /// Open the store at `path`. Never fails; the file need not exist.
    pub fn open<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Open `settings.json` inside `dir`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self::open(dir.as_ref().join(SETTINGS_FILE))
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read `key`, returning `default` when it is missing or holds a value
    /// of the wrong type.
    pub fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        lookup(&read_values(&self.path), key, default)
    }

    /// Store `value` under `key` and persist the store.
    pub fn set<T: Serialize>(&self, key: &str, value: T) -> Result<(), PrintBridgeError> {
        let value = serde_json::to_value(value)
            .map_err(|e| PrintBridgeError::Settings(format!("cannot encode {}: {}", key, e)))?;
        self.update(vec![(key.to_string(), value)])
    }

    /// Current printer settings, with defaults for anything unset.
    pub fn load(&self) -> Settings {
        let values = read_values(&self.path);
        Settings {
            printer_name: lookup(&values, KEY_PRINTER_NAME, String::new()),
            paper_width: lookup(&values, KEY_PAPER_WIDTH, DEFAULT_PAPER_WIDTH),
        }
    }

    /// Validate and persist printer settings in a single file write.
    pub fn save(&self, settings: &Settings) -> Result<(), PrintBridgeError> {
        settings.validate()?;
        self.update(vec![
            (
                KEY_PRINTER_NAME.to_string(),
                Value::from(settings.printer_name.clone()),
            ),
            (KEY_PAPER_WIDTH.to_string(), Value::from(settings.paper_width)),
        ])?;
        tracing::info!(
            printer = %settings.printer_name,
            paper_width = settings.paper_width,
            "settings saved"
        );
        Ok(())
    }

    fn update(&self, entries: Vec<(String, Value)>) -> Result<(), PrintBridgeError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut values = read_values(&self.path);
        for (key, value) in entries {
            values.insert(key, value);
        }
        write_values(&self.path, &values)
    }
}

fn lookup<T: DeserializeOwned>(values: &Map<String, Value>, key: &str, default: T) -> T {
    match values.get(key) {
        Some(value) => match T::deserialize(value) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(key, error = %e, "ignoring stored setting with unexpected type");
                default
            }
        },
        None => default,
    }
}

fn read_values(path: &Path) -> Map<String, Value> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Map::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot read settings, using defaults");
            return Map::new();
        }
    };

    match serde_json::from_str::<Value>(&contents) {
        Ok(Value::Object(values)) => values,
        Ok(_) => {
            tracing::warn!(path = %path.display(), "settings file is not a JSON object, using defaults");
            Map::new()
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "corrupt settings file, using defaults");
            Map::new()
        }
    }
}

fn write_values(path: &Path, values: &Map<String, Value>) -> Result<(), PrintBridgeError> {
    let write_err =
        |e: std::io::Error| PrintBridgeError::Settings(format!("cannot write {}: {}", path.display(), e));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let json = serde_json::to_string_pretty(values)
        .map_err(|e| PrintBridgeError::Settings(format!("cannot encode settings: {}", e)))?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(write_err)?;
    fs::rename(&tmp, path).map_err(write_err)?;
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_before_any_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::in_dir(dir.path());
        assert_eq!(store.load(), Settings::default());
        assert_eq!(store.load().paper_width, 48);
        assert_eq!(store.load().printer_name, "");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::in_dir(dir.path());
        let settings = Settings {
            printer_name: "X".into(),
            paper_width: 80,
        };
        store.save(&settings).unwrap();
        assert_eq!(store.load(), settings);
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        SettingsStore::in_dir(dir.path())
            .save(&Settings {
                printer_name: "POS_PRINTER".into(),
                paper_width: 32,
            })
            .unwrap();

        let reopened = SettingsStore::in_dir(dir.path());
        assert_eq!(reopened.load().printer_name, "POS_PRINTER");
        assert_eq!(reopened.load().paper_width, 32);
    }

    #[test]
    fn test_sees_save_from_another_store() {
        let dir = tempfile::tempdir().unwrap();
        let relay = SettingsStore::in_dir(dir.path());
        assert_eq!(relay.load(), Settings::default());

        let saved = Settings {
            printer_name: "X".into(),
            paper_width: 80,
        };
        SettingsStore::in_dir(dir.path()).save(&saved).unwrap();
        assert_eq!(relay.load(), saved);
    }

    #[test]
    fn test_set_keeps_keys_written_by_another_store() {
        let dir = tempfile::tempdir().unwrap();
        let relay = SettingsStore::in_dir(dir.path());
        relay.set("copies", 2u32).unwrap();
        SettingsStore::in_dir(dir.path())
            .save(&Settings {
                printer_name: "X".into(),
                paper_width: 80,
            })
            .unwrap();

        relay.set("copies", 3u32).unwrap();
        assert_eq!(relay.get("copies", 1u32), 3);
        assert_eq!(relay.load().printer_name, "X");
    }

    #[test]
    fn test_file_corrupted_after_save_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::in_dir(dir.path());
        store
            .save(&Settings {
                printer_name: "X".into(),
                paper_width: 80,
            })
            .unwrap();
        fs::write(store.path(), "{ not json").unwrap();
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "{ not json").unwrap();
        let store = SettingsStore::in_dir(dir.path());
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn test_non_object_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE), "[1, 2, 3]").unwrap();
        assert_eq!(SettingsStore::in_dir(dir.path()).load(), Settings::default());
    }

    #[test]
    fn test_wrong_type_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"printerName": 7, "paperWidth": "wide"}"#,
        )
        .unwrap();
        assert_eq!(SettingsStore::in_dir(dir.path()).load(), Settings::default());
    }

    #[test]
    fn test_get_set_arbitrary_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::in_dir(dir.path());
        assert_eq!(store.get("copies", 1u32), 1);
        store.set("copies", 3u32).unwrap();
        assert_eq!(store.get("copies", 1u32), 3);
        assert_eq!(SettingsStore::in_dir(dir.path()).get("copies", 1u32), 3);
    }

    #[test]
    fn test_zero_paper_width_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::in_dir(dir.path());
        let err = store
            .save(&Settings {
                printer_name: "X".into(),
                paper_width: 0,
            })
            .unwrap_err();
        assert!(matches!(err, PrintBridgeError::InvalidInput(_)));
        assert!(!store.path().exists());
    }

    #[test]
    fn test_creates_missing_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::in_dir(dir.path().join("nested").join("printbridge"));
        store.save(&Settings::default()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_settings_json_is_camel_case() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json, serde_json::json!({"printerName": "", "paperWidth": 48}));
    }
}
