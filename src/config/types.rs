use crate::case::{CaseCategory, CaseTemplate, DocumentNaming};
use crate::extract::ExtractionRules;
use crate::ConfigError;
use serde::Deserialize;
use url::Url;

/// Main configuration structure for Docket-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub site: SiteConfig,
    #[serde(default)]
    pub request: RequestConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    pub case: CaseConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub rules: ExtractionRules,
    #[serde(default, rename = "court")]
    pub courts: Vec<CourtEntry>,
}

impl Config {
    /// Parses the site base URL
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.site.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))
    }

    /// Parses the case number pattern
    pub fn case_template(&self) -> Result<CaseTemplate, ConfigError> {
        Ok(CaseTemplate::parse(&self.case.pattern)?)
    }

    /// Parses the output directory pattern
    pub fn directory_template(&self) -> Result<CaseTemplate, ConfigError> {
        Ok(CaseTemplate::parse(&self.output.directory)?)
    }

    /// Builds the case category of one configured court
    pub fn category(&self, court: &CourtEntry) -> CaseCategory {
        CaseCategory {
            court: court.number,
            year: self.case.year,
            suffix: self.case.suffix.clone(),
            court_code: court.code.clone(),
        }
    }

    /// Returns the configured court with the given number
    pub fn court(&self, number: u32) -> Option<&CourtEntry> {
        self.courts.iter().find(|c| c.number == number)
    }

    pub fn naming(&self) -> DocumentNaming {
        DocumentNaming {
            petition_label: self.output.petition_label.clone(),
            brief_label: self.output.brief_label.clone(),
            extension: self.output.extension.clone(),
        }
    }
}

/// Target site configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Base URL of the case search site
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the case detail page, relative to the base URL
    #[serde(rename = "case-path", default = "default_case_path")]
    pub case_path: String,
}

fn default_case_path() -> String {
    "Case.aspx".to_string()
}

/// Outbound request configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    /// Browser user agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            timeout_secs: 30,
        }
    }
}

/// Crawl loop pacing, retry and early-stop configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Fixed delay between cases (milliseconds)
    #[serde(rename = "base-delay-ms")]
    pub base_delay_ms: u64,

    /// Upper bound of the random delay added to the base delay (milliseconds)
    #[serde(rename = "jitter-ms")]
    pub jitter_ms: u64,

    /// Attempts per request, including the first
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Length of one backoff unit (milliseconds); retry k waits 2^(k-1) units plus jitter
    #[serde(rename = "backoff-unit-ms")]
    pub backoff_unit_ms: u64,

    /// Consecutive cases without the primary section before the run stops
    #[serde(rename = "miss-threshold")]
    pub miss_threshold: u32,

    /// Number of processed cases between progress log lines
    #[serde(rename = "progress-interval")]
    pub progress_interval: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 1000,
            jitter_ms: 500,
            max_attempts: 3,
            backoff_unit_ms: 1000,
            miss_threshold: 50,
            progress_interval: 100,
        }
    }
}

/// Case numbering configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CaseConfig {
    /// Case number pattern, e.g. "{court:02}-{year}-{seq:05}-{suffix}"
    pub pattern: String,

    /// Two-digit filing year
    pub year: u32,

    /// Docket-type suffix
    #[serde(default)]
    pub suffix: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory pattern, e.g. "CA{court:02}_20{year}_Briefs"
    pub directory: String,

    /// Name fragment for petition files
    #[serde(rename = "petition-label")]
    pub petition_label: String,

    /// Name fragment for brief files
    #[serde(rename = "brief-label")]
    pub brief_label: String,

    /// File extension of saved documents
    pub extension: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        let naming = DocumentNaming::default();
        Self {
            directory: "downloads".to_string(),
            petition_label: naming.petition_label,
            brief_label: naming.brief_label,
            extension: naming.extension,
        }
    }
}

/// One court to crawl, with its sequence range
#[derive(Debug, Clone, Deserialize)]
pub struct CourtEntry {
    /// Court number substituted for `{court}`
    #[serde(default)]
    pub number: u32,

    /// Court code sent as the `coa` query parameter
    #[serde(default)]
    pub code: Option<String>,

    /// First sequence number to fetch
    #[serde(default = "default_start")]
    pub start: u32,

    /// Last sequence number to fetch; open-ended when absent
    #[serde(default)]
    pub end: Option<u32>,
}

fn default_start() -> u32 {
    1
}
