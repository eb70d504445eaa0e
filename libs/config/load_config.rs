use std::path::Path;

use eyre::WrapErr;

use crate::Config;

/// Parse the configuration file at `config_path`.
///
/// A missing file is `Ok(None)`, callers decide whether defaults apply. An
/// unreadable or malformed file is an error naming the file.
pub fn load(config_path: impl AsRef<Path>) -> eyre::Result<Option<Config>> {
    let config_path = config_path.as_ref();
    if !config_path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(config_path)
        .wrap_err_with(|| format!("couldn't read config file '{}'", config_path.display()))?;

    toml::from_str(&content)
        .map(Some)
        .wrap_err_with(|| format!("invalid config file '{}'", config_path.display()))
}
