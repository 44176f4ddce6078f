use std::fs;
use std::io;
use std::path::Path;

use anyhow::Context;
use gloom::Settings;

/// Reads settings from a JSON file, falling back to defaults when the file
/// is missing or unreadable.
pub fn load(path: &Path) -> Settings {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::info!("no settings at {}, using defaults", path.display());
            return Settings::default();
        }
        Err(e) => {
            log::warn!("failed to read settings from {}: {}", path.display(), e);
            return Settings::default();
        }
    };

    match serde_json::from_str::<Settings>(&text) {
        Ok(settings) => settings.sanitized(),
        Err(e) => {
            log::warn!("invalid settings in {}: {}", path.display(), e);
            Settings::default()
        }
    }
}

pub fn save(path: &Path, settings: &Settings) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(settings)?;
    fs::write(path, text).with_context(|| format!("writing settings to {}", path.display()))?;
    log::debug!("saved settings to {}", path.display());
    Ok(())
}
