//! Tests for config functionality.

use crate::browser::Browser;
use crate::config::{CONFIG_ENV_VAR, Config, MAX_QUERY_ATTEMPTS};
use crate::restart::{DEFAULT_QUERY_ATTEMPTS, SessionKeyPolicy};
use crate::test_support::EnvGuard;
use serial_test::serial;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.session_key_policy, SessionKeyPolicy::Truncate);
    assert_eq!(config.query_attempts, DEFAULT_QUERY_ATTEMPTS);
    assert!(config.webview2_roots.is_empty());
    assert!(config.extra_roots.is_empty());
}

#[test]
fn test_parse_minimal_yaml() {
    let config = Config::from_yaml("").unwrap();

    // Should use all defaults
    assert_eq!(config, Config::default());
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
session_key_policy: reject
"#;
    let config = Config::from_yaml(yaml).unwrap();

    // Specified values should be used
    assert_eq!(config.session_key_policy, SessionKeyPolicy::Reject);

    // Unspecified values should use defaults
    assert_eq!(config.query_attempts, DEFAULT_QUERY_ATTEMPTS);
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
session_key_policy: truncate
query_attempts: 5
webview2_roots:
  - 'C:\Users\me\AppData\Local\Packages\App\EBWebView'
extra_roots:
  chrome:
    - /opt/chrome-profiles
  brave:
    - /srv/brave-a
    - /srv/brave-b
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.session_key_policy, SessionKeyPolicy::Truncate);
    assert_eq!(config.query_attempts, 5);
    assert_eq!(
        config.webview2_roots,
        vec![PathBuf::from(r"C:\Users\me\AppData\Local\Packages\App\EBWebView")]
    );
    assert_eq!(
        config.extra_roots.get(&Browser::Brave).unwrap(),
        &vec![PathBuf::from("/srv/brave-a"), PathBuf::from("/srv/brave-b")]
    );
}

#[test]
fn test_parse_yaml_with_unknown_fields() {
    // Unknown fields should be silently ignored for forward compatibility
    let yaml = r#"
query_attempts: 2
unknown_field: "some value"
another_unknown:
  nested: true
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.query_attempts, 2);
    assert_eq!(config.session_key_policy, SessionKeyPolicy::Truncate);
}

#[test]
fn test_parse_invalid_policy() {
    let result = Config::from_yaml("session_key_policy: shorten\n");
    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("failed to parse config YAML")
    );
}

#[test]
fn test_parse_unknown_browser_key() {
    let result = Config::from_yaml("extra_roots:\n  netscape: [/tmp]\n");
    assert!(result.is_err());
}

#[test]
fn test_validate_zero_query_attempts() {
    let result = Config::from_yaml("query_attempts: 0\n");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("query_attempts"));
}

#[test]
fn test_validate_query_attempts_upper_bound() {
    let yaml = format!("query_attempts: {}\n", MAX_QUERY_ATTEMPTS + 1);
    assert!(Config::from_yaml(&yaml).is_err());

    let yaml = format!("query_attempts: {}\n", MAX_QUERY_ATTEMPTS);
    assert!(Config::from_yaml(&yaml).is_ok());
}

#[test]
fn test_validate_empty_root() {
    let result = Config::from_yaml("webview2_roots: ['']\n");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("non-empty"));
}

#[test]
fn test_release_options_follow_config() {
    let config = Config::from_yaml("session_key_policy: reject\nquery_attempts: 4\n").unwrap();

    let options = config.release_options();

    assert_eq!(options.key_policy, SessionKeyPolicy::Reject);
    assert_eq!(options.query_attempts, 4);
}

#[test]
fn test_roots_for_webview2_includes_dedicated_list() {
    let yaml = r#"
webview2_roots: [/apps/one/EBWebView]
extra_roots:
  webview2: [/apps/two/EBWebView]
  chrome: [/profiles/chrome]
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(
        config.roots_for(Browser::WebView2),
        vec![
            PathBuf::from("/apps/one/EBWebView"),
            PathBuf::from("/apps/two/EBWebView")
        ]
    );
    assert_eq!(
        config.roots_for(Browser::Chrome),
        vec![PathBuf::from("/profiles/chrome")]
    );
    assert!(config.roots_for(Browser::Brave).is_empty());
}

#[test]
fn test_to_yaml() {
    let mut config = Config::default();
    config
        .extra_roots
        .insert(Browser::Chromium, vec![PathBuf::from("/x")]);
    let yaml = config.to_yaml().unwrap();

    // Should be valid YAML that can be parsed back
    let parsed = Config::from_yaml(&yaml).unwrap();
    assert_eq!(parsed, config);
}

#[test]
fn test_config_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "query_attempts: 7").unwrap();
    writeln!(file, "session_key_policy: reject").unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.query_attempts, 7);
    assert_eq!(config.session_key_policy, SessionKeyPolicy::Reject);
}

#[test]
fn test_config_load_missing_file() {
    let result = Config::load("/nonexistent/path/config.yaml");
    assert!(result.is_err());
    let err = result.unwrap_err();
    assert!(err.to_string().contains("failed to read config file"));
}

#[test]
#[serial]
fn test_resolve_prefers_explicit_path() {
    let mut env_file = NamedTempFile::new().unwrap();
    writeln!(env_file, "query_attempts: 2").unwrap();
    let mut explicit = NamedTempFile::new().unwrap();
    writeln!(explicit, "query_attempts: 9").unwrap();
    let _env = EnvGuard::set(CONFIG_ENV_VAR, env_file.path());

    let config = Config::resolve(Some(explicit.path())).unwrap();

    assert_eq!(config.query_attempts, 9);
}

#[test]
#[serial]
fn test_resolve_uses_env_var() {
    let mut env_file = NamedTempFile::new().unwrap();
    writeln!(env_file, "query_attempts: 2").unwrap();
    let _env = EnvGuard::set(CONFIG_ENV_VAR, env_file.path());

    let config = Config::resolve(None).unwrap();

    assert_eq!(config.query_attempts, 2);
}

#[test]
#[serial]
fn test_resolve_env_var_pointing_nowhere_is_an_error() {
    let dir = TempDir::new().unwrap();
    let _env = EnvGuard::set(CONFIG_ENV_VAR, dir.path().join("missing.yaml"));

    assert!(Config::resolve(None).is_err());
}

#[test]
#[serial]
fn test_resolve_empty_env_var_is_ignored() {
    let _env = EnvGuard::set(CONFIG_ENV_VAR, "");
    // Falls through to the default location, which may or may not exist on
    // the test machine; only the env var must not be treated as a path.
    if let Err(e) = Config::resolve(None) {
        assert!(!e.to_string().contains("''"));
    }
}

#[test]
#[serial]
fn test_resolve_without_env_var() {
    let _env = EnvGuard::unset(CONFIG_ENV_VAR);
    let expected_default = crate::config::default_config_path().is_none_or(|p| !p.is_file());

    let config = Config::resolve(None);

    if expected_default {
        assert_eq!(config.unwrap(), Config::default());
    }
}
