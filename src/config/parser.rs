use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use docket_harvest::config::load_config;
///
/// let config = load_config(Path::new("harvest.toml")).unwrap();
/// println!("Courts: {}", config.courts.len());
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so a run's output can be tied back to the exact
/// configuration that produced it.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::FilerRole;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[site]
base-url = "https://search.txcourts.gov"

[crawl]
miss-threshold = 25

[case]
pattern = "{court:02}-{year}-{seq:05}-{suffix}"
year = 24
suffix = "CR"

[output]
directory = "CA{court:02}_20{year}_Briefs"

[rules]
primary-section = "Appellate Briefs"

[rules.petition]
enabled = false

[[court]]
number = 1
start = 516

[[court]]
number = 14
start = 12
end = 900
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.site.case_path, "Case.aspx");
        assert_eq!(config.request.timeout_secs, 30);
        assert_eq!(config.crawl.miss_threshold, 25);
        assert_eq!(config.crawl.max_attempts, 3);
        assert_eq!(config.courts.len(), 2);
        assert_eq!(config.courts[0].end, None);
        assert_eq!(config.courts[1].end, Some(900));
        assert!(!config.rules.petition.enabled);
        assert_eq!(
            config.rules.brief.accepted_roles,
            vec![FilerRole::Appellant, FilerRole::Appellee]
        );

        let category = config.category(&config.courts[1]);
        let directory = category.render(&config.directory_template().unwrap()).unwrap();
        assert_eq!(directory, "CA14_2024_Briefs");
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse_config(
            r#"
[site]
base-url = "https://search.txcourts.gov"

[case]
pattern = "PD-{seq:04}-{year}"
year = 24

[[court]]
code = "coscca"
end = 1081
"#,
        )
        .unwrap();

        assert_eq!(config.crawl.base_delay_ms, 1000);
        assert_eq!(config.crawl.jitter_ms, 500);
        assert_eq!(config.output.directory, "downloads");
        assert_eq!(config.output.petition_label, "PDR");
        assert_eq!(config.rules.primary_section, "Case Events");
        assert_eq!(config.courts[0].start, 1);
        assert_eq!(config.courts[0].code.as_deref(), Some("coscca"));
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/harvest.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[site]
base-url = "https://search.txcourts.gov"

[case]
pattern = "PD-{year}"
year = 24

[[court]]
start = 1
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
