use super::*;

// =============================================================================
// normalize_base_url
// =============================================================================

#[test]
fn normalize_strips_trailing_slashes() {
    assert_eq!(normalize_base_url("http://localhost:8000/api//").unwrap(), "http://localhost:8000/api");
}

#[test]
fn normalize_accepts_https() {
    assert_eq!(normalize_base_url(" https://blog.example.com/api ").unwrap(), "https://blog.example.com/api");
}

#[test]
fn normalize_rejects_missing_scheme() {
    assert_eq!(
        normalize_base_url("localhost:8000/api"),
        Err(ConfigError::InvalidBaseUrl("localhost:8000/api".to_owned()))
    );
}

#[test]
fn normalize_rejects_ws_scheme() {
    assert!(normalize_base_url("ws://localhost:8000").is_err());
}

// =============================================================================
// ClientConfig
// =============================================================================

#[test]
fn new_uses_default_timeouts() {
    let config = ClientConfig::new(DEFAULT_BASE_URL).unwrap();
    assert_eq!(config.timeout, Duration::from_secs(10));
    assert_eq!(config.connect_timeout, Duration::from_secs(5));
    assert_eq!(config.session_file, PathBuf::from(".blog-session.json"));
}

#[test]
fn url_joins_with_single_slash() {
    let config = ClientConfig::new("http://localhost:8000/api/").unwrap();
    assert_eq!(config.url("/blogs/"), "http://localhost:8000/api/blogs/");
    assert_eq!(config.url("tags/"), "http://localhost:8000/api/tags/");
}

#[test]
fn builders_override_fields() {
    let config = ClientConfig::new(DEFAULT_BASE_URL)
        .unwrap()
        .with_timeout(Duration::from_millis(250))
        .with_session_file("/tmp/session.json");
    assert_eq!(config.timeout, Duration::from_millis(250));
    assert_eq!(config.session_file, PathBuf::from("/tmp/session.json"));
}

// =============================================================================
// env_parse — unique env var names avoid races with parallel tests.
// =============================================================================

#[test]
fn env_parse_reads_value() {
    let key = "__TEST_BLOG_ENV_PARSE_OK_311__";
    unsafe { std::env::set_var(key, " 42 ") };
    assert_eq!(env_parse(key, 7_u64), 42);
    unsafe { std::env::remove_var(key) };
}

#[test]
fn env_parse_falls_back_on_garbage() {
    let key = "__TEST_BLOG_ENV_PARSE_BAD_312__";
    unsafe { std::env::set_var(key, "soon") };
    assert_eq!(env_parse(key, 7_u64), 7);
    unsafe { std::env::remove_var(key) };
}

#[test]
fn env_parse_unset_uses_default() {
    assert_eq!(env_parse("__TEST_BLOG_ENV_PARSE_UNSET_313__", 9_u64), 9);
}
