use super::load::{default_config_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn defaults_are_sane() {
    let s = Settings::default();
    assert_eq!(s.playback.tick_interval_ms, 1000);
    assert!(s.playback.restore_on_start);
    assert!(s.remote.enabled);
    assert_eq!(s.remote.identity, "segue");
    assert!(s.artwork.enabled);
    assert_eq!(s.artwork.timeout_ms, 5000);
    assert!(s.artwork.cache_dir.is_none());
    assert!(s.state.path.is_none());
    assert!(s.validate().is_ok());
}

#[test]
fn validate_rejects_zero_intervals_and_bad_identities() {
    let mut s = Settings::default();
    s.playback.tick_interval_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.artwork.timeout_ms = 0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.remote.identity = "9starts-with-digit".to_string();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.remote.identity = "has.dots".to_string();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.remote.identity = "_fine_Name2".to_string();
    assert!(s.validate().is_ok());
}

#[test]
fn resolve_config_path_prefers_segue_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("SEGUE_CONFIG_PATH", "/tmp/segue-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/segue-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("segue")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("segue")
            .join("config.toml")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
tick_interval_ms = 500
restore_on_start = false

[remote]
enabled = false
identity = "segue_test"

[artwork]
enabled = false
timeout_ms = 250
cache_dir = "/tmp/segue-art"

[state]
path = "/tmp/segue-session.toml"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("SEGUE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("SEGUE__PLAYBACK__TICK_INTERVAL_MS");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.tick_interval_ms, 500);
    assert!(!s.playback.restore_on_start);
    assert!(!s.remote.enabled);
    assert_eq!(s.remote.identity, "segue_test");
    assert!(!s.artwork.enabled);
    assert_eq!(s.artwork.timeout_ms, 250);
    assert_eq!(
        s.artwork.cache_dir.as_deref(),
        Some(std::path::Path::new("/tmp/segue-art"))
    );
    assert_eq!(
        s.state.path.as_deref(),
        Some(std::path::Path::new("/tmp/segue-session.toml"))
    );
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
tick_interval_ms = 500
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("SEGUE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("SEGUE__PLAYBACK__TICK_INTERVAL_MS", "250");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.tick_interval_ms, 250);
}
