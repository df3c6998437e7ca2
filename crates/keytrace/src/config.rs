use crate::events::AppEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use keytrace_core::settings::Settings;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;
use thiserror::Error;

const ENV_PREFIX: &str = "KEYTRACE";
const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "troia", "keytrace").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

/// `KEYTRACE_LINE__WIDTH=5` overrides `line.width`.
fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn deserialize(source: config::Config) -> Result<Settings, ConfigError> {
    Ok(source.try_deserialize::<Settings>()?.clamped())
}

pub fn load_config() -> Result<Settings, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(environment())
        .build()?;

    deserialize(s)
}

/// Parses settings from TOML text, still layered under the environment.
pub fn parse_config(toml: &str) -> Result<Settings, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .add_source(environment())
        .build()?;

    deserialize(s)
}

pub fn load_or_default() -> Settings {
    match load_config() {
        Ok(c) => c,
        Err(e) => {
            log::warn!("Using default settings: {}", e);
            Settings::default()
        }
    }
}

pub fn write_default_config() -> std::io::Result<PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
        log::info!("Wrote default config to {}", path.display());
    }
    Ok(path)
}

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keytrace_core::settings::{KeyShape, KeyboardTheme, LineStyle};

    #[test]
    fn test_default_config_matches_defaults() {
        let parsed = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn test_case_insensitive_values() {
        let toml = r##"
[keyboard]
theme = "Neon"
key_shape = "CIRCULAR"
three_d = true
primary_color = "#ff00ff"

[line]
style = "Dotted"
width = 25
"##;
        let settings = parse_config(toml).unwrap();
        assert_eq!(settings.keyboard.theme, KeyboardTheme::Neon);
        assert_eq!(settings.keyboard.key_shape, KeyShape::Circular);
        assert!(settings.keyboard.three_d);
        assert_eq!(settings.keyboard.primary_color.to_string(), "#ff00ff");
        assert_eq!(settings.line.style, LineStyle::Dotted);
        assert_eq!(settings.line.width, 10.0);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(parse_config("[keyboard]\ntheme = \"sepia\"\n").is_err());
        assert!(parse_config("[line]\ncolor = \"blue-ish\"\n").is_err());
    }
}
