use serde::Deserialize;

/// Default location of the exported CSV table
pub const DEFAULT_CSV_PATH: &str = "out/mnamky.csv";

/// Main configuration structure for Mnamky
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub template: TemplateConfig,
}

/// The blog catalogue to crawl
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TargetConfig {
    /// Listing URL without any pagination query
    #[serde(rename = "base-url")]
    pub base_url: Option<String>,

    /// Last listing page to visit; the discovered last page if unset
    #[serde(rename = "until-page")]
    pub until_page: Option<u32>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the CSV file to write
    #[serde(rename = "csv-path", default = "default_csv_path")]
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
        }
    }
}

/// HTTP client settings
///
/// Both fields are optional: with neither set, requests go out with the
/// client defaults and never time out.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpConfig {
    /// Value of the User-Agent header
    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,
}

/// Markup shape of the crawled site
///
/// The defaults describe the blog template this tool was written for.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Anchor inside the "last page" pagination item
    #[serde(rename = "pagination-last")]
    pub pagination_last: String,

    /// Container of one listed entry
    #[serde(rename = "entry-container")]
    pub entry_container: String,

    /// Image element inside an entry
    pub image: String,

    /// Attribute holding the responsive source set
    #[serde(rename = "image-srcset-attribute")]
    pub image_srcset_attribute: String,

    /// The image URL is the part of the source set before this marker
    #[serde(rename = "image-srcset-marker")]
    pub image_srcset_marker: String,

    /// Anchor carrying the detail link and the title
    #[serde(rename = "body-link")]
    pub body_link: String,

    /// Paragraph with the entry summary
    #[serde(rename = "body-text")]
    pub body_text: String,

    /// Regex with one capture group for the sequence number
    #[serde(rename = "number-pattern")]
    pub number_pattern: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            pagination_last: "li.pagination-last a".to_string(),
            entry_container: "div.entry-inner".to_string(),
            image: "img".to_string(),
            image_srcset_attribute: "data-srcset".to_string(),
            image_srcset_marker: " 360w".to_string(),
            body_link: "div.entry-body a".to_string(),
            body_text: "p.entry-body__text".to_string(),
            number_pattern: "Mňamka #([0-9]{0,3})".to_string(),
        }
    }
}

fn default_csv_path() -> String {
    DEFAULT_CSV_PATH.to_string()
}
