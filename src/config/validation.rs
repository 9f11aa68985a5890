use crate::config::types::{
    CaseConfig, Config, CourtEntry, CrawlConfig, OutputConfig, RequestConfig, SiteConfig,
};
use crate::case::{CaseTemplate, Field};
use crate::extract::ExtractionRules;
use crate::page::{PageLayout, PageModel};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_request_config(&config.request)?;
    validate_crawl_config(&config.crawl)?;
    validate_case_config(&config.case)?;
    validate_output_config(&config.output)?;
    validate_rules(&config.rules)?;
    validate_courts(&config.courts)?;
    Ok(())
}

/// Validates site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base-url '{}' must use http or https",
            config.base_url
        )));
    }

    if config.case_path.trim().is_empty() {
        return Err(ConfigError::Validation(
            "case-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates request configuration
fn validate_request_config(config: &RequestConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates crawl loop configuration
fn validate_crawl_config(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 || config.max_attempts > 10 {
        return Err(ConfigError::Validation(format!(
            "max-attempts must be between 1 and 10, got {}",
            config.max_attempts
        )));
    }

    if config.miss_threshold < 1 {
        return Err(ConfigError::Validation(format!(
            "miss-threshold must be >= 1, got {}",
            config.miss_threshold
        )));
    }

    if config.progress_interval < 1 {
        return Err(ConfigError::Validation(format!(
            "progress-interval must be >= 1, got {}",
            config.progress_interval
        )));
    }

    Ok(())
}

/// Validates case numbering configuration
fn validate_case_config(config: &CaseConfig) -> Result<(), ConfigError> {
    let template = CaseTemplate::parse(&config.pattern)?;
    if !template.uses_seq() {
        return Err(ConfigError::Validation(format!(
            "case pattern '{}' must contain {{seq}}",
            config.pattern
        )));
    }

    if config.year > 9999 {
        return Err(ConfigError::Validation(format!(
            "year must be at most four digits, got {}",
            config.year
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.trim().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    let template = CaseTemplate::parse(&config.directory)?;
    if template.uses(Field::Seq) {
        return Err(ConfigError::Validation(format!(
            "output directory '{}' cannot depend on {{seq}}",
            config.directory
        )));
    }

    for (name, value) in [
        ("petition-label", &config.petition_label),
        ("brief-label", &config.brief_label),
        ("extension", &config.extension),
    ] {
        if value.contains(['/', '\\']) {
            return Err(ConfigError::Validation(format!(
                "{} cannot contain path separators, got '{}'",
                name, value
            )));
        }
    }

    Ok(())
}

/// Validates extraction rules, including that every selector compiles
fn validate_rules(rules: &ExtractionRules) -> Result<(), ConfigError> {
    if rules.primary_section.trim().is_empty() {
        return Err(ConfigError::Validation(
            "primary-section cannot be empty".to_string(),
        ));
    }

    PageModel::new(&PageLayout {
        heading: &rules.heading_selector,
        grid: &rules.grid_selector,
        document_grid: &rules.document_grid_selector,
        case_sensitive: rules.case_sensitive_labels,
    })?;

    if !rules.petition.enabled && !rules.brief.enabled {
        return Err(ConfigError::Validation(
            "at least one of the petition and brief rules must be enabled".to_string(),
        ));
    }

    if rules.petition.enabled {
        let petition = &rules.petition;
        require_label("petition section", &petition.section)?;
        require_label("petition document-type", &petition.document_type)?;
        require_label("petition disposition-event", &petition.disposition_event)?;
    }

    if rules.brief.enabled {
        let brief = &rules.brief;
        require_label("brief section", &brief.section)?;
        require_label("brief event", &brief.event)?;
        require_label("brief document-type", &brief.document_type)?;

        if !brief.accepted_roles.iter().any(|r| brief.accepts(r)) {
            return Err(ConfigError::Validation(
                "brief rule accepts no filer roles".to_string(),
            ));
        }
    }

    Ok(())
}

fn require_label(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
    }
    Ok(())
}

/// Validates court entries
fn validate_courts(courts: &[CourtEntry]) -> Result<(), ConfigError> {
    if courts.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[court]] entry is required".to_string(),
        ));
    }

    for (i, court) in courts.iter().enumerate() {
        if courts[..i].iter().any(|c| c.number == court.number) {
            return Err(ConfigError::Validation(format!(
                "court {} is configured more than once",
                court.number
            )));
        }

        if let Some(code) = &court.code {
            if code.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "court {} has an empty code",
                    court.number
                )));
            }
        }

        if let Some(end) = court.end {
            if end < court.start {
                return Err(ConfigError::Validation(format!(
                    "court {}: end ({}) is before start ({})",
                    court.number, end, court.start
                )));
            }
        }
    }

    Ok(())
}
