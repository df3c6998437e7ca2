use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid color '{0}', expected a hex value such as #4a9eff")]
    InvalidColor(String),
}
