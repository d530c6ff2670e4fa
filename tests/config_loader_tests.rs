use csa_loop::config::{ConfigError, ConfigLoader};
use std::{
    env, fs,
    path::PathBuf,
    sync::{Mutex, MutexGuard, OnceLock},
};
use tempfile::TempDir;

// base64 of 32 bytes of 'a'
const SESSION_KEY: &str = "YWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWFhYWE=";

const KEYS: [&str; 8] = [
    "CSA_LOOP_PROFILE",
    "CSA_LOOP_API_BIND_ADDR",
    "CSA_LOOP_LOG_LEVEL",
    "CSA_LOOP_SESSION_KEY",
    "CSA_LOOP_BCRYPT_COST",
    "CSA_LOOP_BLOB_URL_PREFIX",
    "CSA_LOOP_PAGE_SIZE",
    "CSA_LOOP_UPLOAD_MAX_BYTES",
];

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

fn env_guard() -> MutexGuard<'static, ()> {
    env_lock()
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

fn clear_env() {
    for key in KEYS {
        unsafe {
            env::remove_var(key);
        }
    }
}

fn set_session_key() {
    unsafe {
        env::set_var("CSA_LOOP_SESSION_KEY", SESSION_KEY);
    }
}

fn write_env_file(dir: &TempDir, name: &str, contents: &str) {
    let path = dir.path().join(name);
    fs::write(path, contents).unwrap();
}

fn loader(dir: &TempDir) -> ConfigLoader {
    ConfigLoader::with_base_dir(PathBuf::from(dir.path()))
}

#[test]
fn loads_defaults_when_only_session_key_is_set() {
    let _guard = env_guard();
    clear_env();
    set_session_key();

    let temp_dir = TempDir::new().unwrap();
    let cfg = loader(&temp_dir).load().expect("config loads with defaults");

    assert_eq!(cfg.profile, "local");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:8080");
    assert_eq!(cfg.page_size, 9);
    assert_eq!(cfg.upload_max_bytes, 10 * 1024 * 1024);
    assert_eq!(cfg.session_key.as_deref(), Some(&[b'a'; 32][..]));
    assert!(!cfg.is_production());
    cfg.bind_addr().expect("default bind addr parses");
    clear_env();
}

#[test]
fn missing_session_key_is_an_error() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    let err = loader(&temp_dir).load().expect_err("session key is required");

    assert!(matches!(err, ConfigError::MissingSessionKey));
    clear_env();
}

#[test]
fn short_session_key_is_an_error() {
    let _guard = env_guard();
    clear_env();
    unsafe {
        env::set_var("CSA_LOOP_SESSION_KEY", "c2hvcnQ=");
    }

    let temp_dir = TempDir::new().unwrap();
    let err = loader(&temp_dir).load().expect_err("short key rejected");

    assert!(matches!(
        err,
        ConfigError::InvalidSessionKeyLength { length: 5 }
    ));
    clear_env();
}

#[test]
fn layered_env_files_apply_in_order() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(&temp_dir, ".env", "CSA_LOOP_API_BIND_ADDR=127.0.0.1:3000\n");
    write_env_file(
        &temp_dir,
        ".env.test",
        "CSA_LOOP_API_BIND_ADDR=192.168.0.10:5000\nCSA_LOOP_PAGE_SIZE=12\n",
    );
    write_env_file(
        &temp_dir,
        ".env.test.local",
        "CSA_LOOP_API_BIND_ADDR=10.0.0.5:6000\n",
    );

    // Select profile via .env.local before profile-specific files load.
    write_env_file(
        &temp_dir,
        ".env.local",
        &format!(
            "CSA_LOOP_PROFILE=test\nCSA_LOOP_API_BIND_ADDR=127.0.0.1:4000\nCSA_LOOP_SESSION_KEY={SESSION_KEY}\n"
        ),
    );

    let cfg = loader(&temp_dir)
        .load()
        .expect("config loads with layered env files");

    assert_eq!(cfg.profile, "test");
    assert_eq!(cfg.api_bind_addr, "10.0.0.5:6000");
    assert_eq!(cfg.page_size, 12);
    clear_env();
}

#[test]
fn os_environment_has_highest_precedence() {
    let _guard = env_guard();
    clear_env();

    let temp_dir = TempDir::new().unwrap();
    write_env_file(
        &temp_dir,
        ".env",
        "CSA_LOOP_API_BIND_ADDR=127.0.0.1:3000\nCSA_LOOP_BCRYPT_COST=10\n",
    );

    unsafe {
        env::set_var("CSA_LOOP_API_BIND_ADDR", "0.0.0.0:9090");
    }
    set_session_key();

    let cfg = loader(&temp_dir).load().expect("config loads with env override");
    assert_eq!(cfg.api_bind_addr, "0.0.0.0:9090");
    assert_eq!(cfg.bcrypt_cost, 10);

    clear_env();
}

#[test]
fn production_profile_is_detected() {
    let _guard = env_guard();
    clear_env();
    set_session_key();
    unsafe {
        env::set_var("CSA_LOOP_PROFILE", "production");
    }

    let temp_dir = TempDir::new().unwrap();
    let cfg = loader(&temp_dir).load().expect("production config loads");

    assert!(cfg.is_production());
    clear_env();
}

#[test]
fn invalid_values_are_rejected() {
    let _guard = env_guard();
    clear_env();
    set_session_key();
    let temp_dir = TempDir::new().unwrap();

    unsafe {
        env::set_var("CSA_LOOP_API_BIND_ADDR", "not-an-addr");
    }
    let err = loader(&temp_dir)
        .load()
        .expect_err("invalid bind addr should fail");
    assert!(format!("{}", err).contains("invalid api bind address"));
    unsafe {
        env::remove_var("CSA_LOOP_API_BIND_ADDR");
    }

    unsafe {
        env::set_var("CSA_LOOP_BCRYPT_COST", "3");
    }
    let err = loader(&temp_dir).load().expect_err("cost below 4 fails");
    assert!(matches!(err, ConfigError::InvalidBcryptCost { value: 3 }));
    unsafe {
        env::remove_var("CSA_LOOP_BCRYPT_COST");
    }

    unsafe {
        env::set_var("CSA_LOOP_BLOB_URL_PREFIX", "uploads/relative");
    }
    let err = loader(&temp_dir).load().expect_err("relative prefix fails");
    assert!(matches!(err, ConfigError::InvalidBlobUrlPrefix { .. }));

    clear_env();
}

#[test]
fn redacted_json_hides_the_session_key() {
    let _guard = env_guard();
    clear_env();
    set_session_key();

    let temp_dir = TempDir::new().unwrap();
    let cfg = loader(&temp_dir).load().unwrap();
    let json = cfg.redacted_json().unwrap();

    assert!(!json.contains(SESSION_KEY));
    assert!(json.contains("\"SESSION_KEY\": \"[REDACTED]\""));
    clear_env();
}
