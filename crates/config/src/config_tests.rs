//! Unit tests for configuration loading

#[cfg(test)]
mod tests {
    use crate::{
        AuthConfig, AuthConfigBuilder, CachePolicy, ConfigLoader, DEFAULT_LOOKUP_TIMEOUT,
        ENV_CACHE_POLICY, ENV_LOOKUP_TIMEOUT,
    };
    use serial_test::serial;
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(json.as_bytes())
            .expect("Failed to write config");
        file
    }

    fn clear_env() {
        std::env::remove_var(ENV_CACHE_POLICY);
        std::env::remove_var(ENV_LOOKUP_TIMEOUT);
    }

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.cache_policy, CachePolicy::default());
        assert_eq!(config.lookup_timeout, Some(DEFAULT_LOOKUP_TIMEOUT));
    }

    #[test]
    fn test_from_json_string_policy() {
        let config =
            AuthConfig::from_json(r#"{"cachePolicy": "maxEntries=50, ttl=2m", "lookupTimeout": "250ms"}"#)
                .unwrap();
        assert_eq!(config.cache_policy.max_entries, Some(50));
        assert_eq!(config.cache_policy.ttl, Some(Duration::from_secs(120)));
        assert_eq!(config.lookup_timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_from_json_null_timeout_disables_bound() {
        let config = AuthConfig::from_json(r#"{"lookupTimeout": null}"#).unwrap();
        assert_eq!(config.lookup_timeout, None);
        assert_eq!(config.cache_policy, CachePolicy::default());
    }

    #[test]
    fn test_unknown_fields_fail_loading() {
        assert!(AuthConfig::from_json(r#"{"cachePolicy": "ttl=1m", "realm": "REST"}"#).is_err());
        assert!(AuthConfig::from_json(r#"{"cachePolicy": "ttl=1m, weakKeys=true"}"#).is_err());
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = AuthConfigBuilder::new()
            .cache_policy(CachePolicy::unbounded().with_ttl(Duration::from_secs(30)))
            .no_lookup_timeout()
            .build();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"cachePolicy":"ttl=30s","lookupTimeout":null}"#);
        assert_eq!(AuthConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    #[serial]
    fn test_loader_reads_file() {
        clear_env();
        let file = write_config(r#"{"cachePolicy": {"maxEntries": 7}}"#);
        let config = ConfigLoader::new().file(file.path()).load().unwrap();
        assert_eq!(config.cache_policy.max_entries, Some(7));
        assert_eq!(config.cache_policy.ttl, None);
    }

    #[test]
    #[serial]
    fn test_loader_missing_file_is_error() {
        clear_env();
        let result = ConfigLoader::new()
            .file("/nonexistent/merchant-auth.json")
            .load();
        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        clear_env();
        let file = write_config(r#"{"cachePolicy": "maxEntries=7", "lookupTimeout": "1s"}"#);
        std::env::set_var(ENV_CACHE_POLICY, "maxEntries=99, ttl=5m");
        std::env::set_var(ENV_LOOKUP_TIMEOUT, "off");

        let config = ConfigLoader::new().file(file.path()).load().unwrap();
        assert_eq!(config.cache_policy.max_entries, Some(99));
        assert_eq!(config.cache_policy.ttl, Some(Duration::from_secs(300)));
        assert_eq!(config.lookup_timeout, None);

        let ignored = ConfigLoader::new().file(file.path()).without_env().load().unwrap();
        assert_eq!(ignored.cache_policy.max_entries, Some(7));
        assert_eq!(ignored.lookup_timeout, Some(Duration::from_secs(1)));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_bad_env_policy_fails_loading() {
        clear_env();
        std::env::set_var(ENV_CACHE_POLICY, "maxEntries=10, recordStats");
        let err = ConfigLoader::new().load().unwrap_err();
        assert!(err.to_string().contains(ENV_CACHE_POLICY));
        clear_env();
    }
}
