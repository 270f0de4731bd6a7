//! User configuration loading for razor-bridge.
//!
//! User config location: $XDG_CONFIG_HOME/razor-bridge/razor-bridge.toml
//! Fallback: the platform config directory reported by `dirs::config_dir()`.

use std::fs;
use std::path::PathBuf;

use super::settings::SettingsLayer;
use crate::error::RazorResult;

const CONFIG_DIR_NAME: &str = "razor-bridge";
pub const CONFIG_FILE_NAME: &str = "razor-bridge.toml";

/// Returns the path to the user configuration file.
///
/// Returns None if neither $XDG_CONFIG_HOME nor a platform config directory
/// can be determined.
pub fn user_config_path() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)?;

    Some(base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load the user configuration layer.
///
/// A missing file is not an error and yields `Ok(None)`.
pub fn load_user_config() -> RazorResult<Option<SettingsLayer>> {
    let Some(path) = user_config_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&path)?;
    Ok(Some(toml::from_str(&contents)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    struct XdgGuard(Option<std::ffi::OsString>);

    impl XdgGuard {
        fn set(value: &std::path::Path) -> Self {
            let original = env::var_os("XDG_CONFIG_HOME");
            // SAFETY: serialized through #[serial(xdg_env)]
            unsafe { env::set_var("XDG_CONFIG_HOME", value) };
            Self(original)
        }
    }

    impl Drop for XdgGuard {
        fn drop(&mut self) {
            // SAFETY: serialized through #[serial(xdg_env)]
            unsafe {
                match self.0.take() {
                    Some(value) => env::set_var("XDG_CONFIG_HOME", value),
                    None => env::remove_var("XDG_CONFIG_HOME"),
                }
            }
        }
    }

    #[test]
    #[serial(xdg_env)]
    fn user_config_path_uses_xdg_config_home_when_set() {
        let _guard = XdgGuard::set(std::path::Path::new("/custom/config"));

        assert_eq!(
            user_config_path(),
            Some(PathBuf::from("/custom/config/razor-bridge/razor-bridge.toml"))
        );
    }

    #[test]
    #[serial(xdg_env)]
    fn missing_user_config_is_not_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let _guard = XdgGuard::set(dir.path());

        assert!(load_user_config().unwrap().is_none());
    }

    #[test]
    #[serial(xdg_env)]
    fn user_config_is_parsed() {
        let dir = tempfile::TempDir::new().unwrap();
        let config_dir = dir.path().join("razor-bridge");
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(
            config_dir.join(CONFIG_FILE_NAME),
            "synchronizationTimeoutMs = 750\n",
        )
        .unwrap();
        let _guard = XdgGuard::set(dir.path());

        let layer = load_user_config().unwrap().expect("user config should load");
        assert_eq!(layer.synchronization_timeout_ms, Some(750));
    }
}
