use super::*;
use tempfile::TempDir;

#[test]
fn default_config_is_valid() {
    let config = Config::load(TempDir::new().expect("tempdir").path()).expect("load defaults");

    assert!(config.validate().is_ok());
    assert_eq!(config.ollama.host, "localhost");
    assert_eq!(config.ollama.port, 11434);
    assert_eq!(config.retrieval.match_threshold, DEFAULT_MATCH_THRESHOLD);
    assert_eq!(config.retrieval.fallback_response, DEFAULT_FALLBACK_RESPONSE);
}

#[test]
fn load_missing_file_uses_defaults_and_base_dir() {
    let temp_dir = TempDir::new().expect("tempdir");
    let config = Config::load(temp_dir.path()).expect("load defaults");

    assert_eq!(config.get_base_dir(), temp_dir.path());
    assert_eq!(
        config.database_path(),
        temp_dir.path().join("answerbox.db")
    );
    assert_eq!(config.ollama, OllamaConfig::default());
}

#[test]
fn save_and_reload_round_trip() {
    let temp_dir = TempDir::new().expect("tempdir");
    let mut config = Config::load(temp_dir.path()).expect("load defaults");
    config.ollama.host = "embeddings.internal".to_string();
    config.ollama.batch_size = 32;
    config.retrieval.match_threshold = 0.45;

    config.save().expect("save config");

    let reloaded = Config::load(temp_dir.path()).expect("reload config");
    assert_eq!(reloaded.ollama.host, "embeddings.internal");
    assert_eq!(reloaded.ollama.batch_size, 32);
    assert_eq!(reloaded.retrieval.match_threshold, 0.45);
}

#[test]
fn ollama_url_formatting() {
    let ollama = OllamaConfig {
        protocol: "https".to_string(),
        host: "example.com".to_string(),
        port: 8443,
        ..OllamaConfig::default()
    };

    let url = ollama.url().expect("valid url");
    assert_eq!(url.as_str(), "https://example.com:8443/");
}

#[test]
fn rejects_invalid_protocol() {
    let ollama = OllamaConfig {
        protocol: "ftp".to_string(),
        ..OllamaConfig::default()
    };

    assert!(matches!(
        ollama.validate(),
        Err(ConfigError::InvalidProtocol(_))
    ));
}

#[test]
fn rejects_zero_port() {
    let ollama = OllamaConfig {
        port: 0,
        ..OllamaConfig::default()
    };

    assert!(matches!(ollama.validate(), Err(ConfigError::InvalidPort(0))));
}

#[test]
fn rejects_out_of_range_batch_size() {
    let ollama = OllamaConfig {
        batch_size: 0,
        ..OllamaConfig::default()
    };
    assert!(matches!(
        ollama.validate(),
        Err(ConfigError::InvalidBatchSize(0))
    ));

    let ollama = OllamaConfig {
        batch_size: 1001,
        ..OllamaConfig::default()
    };
    assert!(matches!(
        ollama.validate(),
        Err(ConfigError::InvalidBatchSize(1001))
    ));
}

#[test]
fn rejects_empty_model() {
    let ollama = OllamaConfig {
        model: "  ".to_string(),
        ..OllamaConfig::default()
    };

    assert!(matches!(
        ollama.validate(),
        Err(ConfigError::InvalidModel(_))
    ));
}

#[test]
fn rejects_threshold_outside_open_interval() {
    for threshold in [0.0, 1.0, -0.2, 1.5] {
        let retrieval = RetrievalConfig {
            match_threshold: threshold,
            ..RetrievalConfig::default()
        };
        assert!(
            matches!(
                retrieval.validate(),
                Err(ConfigError::InvalidMatchThreshold(_))
            ),
            "threshold {} should be rejected",
            threshold
        );
    }
}

#[test]
fn rejects_blank_fallback_response() {
    let retrieval = RetrievalConfig {
        fallback_response: "   ".to_string(),
        ..RetrievalConfig::default()
    };

    assert!(matches!(
        retrieval.validate(),
        Err(ConfigError::EmptyFallbackResponse)
    ));
}

#[test]
fn invalid_saved_config_fails_to_load() {
    let temp_dir = TempDir::new().expect("tempdir");
    std::fs::write(
        temp_dir.path().join("config.toml"),
        "[retrieval]\nmatch_threshold = 2.0\n",
    )
    .expect("write config");

    assert!(Config::load(temp_dir.path()).is_err());
}
