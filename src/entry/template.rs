//! Site templates: where on a page the crawler finds its data
//!
//! A [`SiteTemplate`] knows the markup shape of one kind of blog listing.
//! Everything else in the crate works on parsed documents through this
//! trait, so a redesign of the site only needs a new template.

use crate::config::TemplateConfig;
use crate::entry::Entry;
use crate::{ConfigError, ConfigResult, Result, ScrapeError};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// Field extraction strategy for one site layout
pub trait SiteTemplate: Send + Sync {
    /// Returns the `href` of the "last page" link of the pagination control
    fn last_page_href(&self, document: &Html) -> Result<String>;

    /// Returns every entry container on a listing page, in document order
    fn entry_fragments<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>>;

    /// Extracts one entry from its container
    fn parse_entry(&self, fragment: ElementRef<'_>) -> Result<Entry>;
}

/// Compiles a CSS selector, mapping failures to a configuration error
pub fn compile_selector(css: &str) -> ConfigResult<Selector> {
    Selector::parse(css).map_err(|e| ConfigError::InvalidSelector {
        selector: css.to_string(),
        message: format!("{:?}", e),
    })
}

/// Compiles the sequence number pattern
///
/// The pattern must have at least one capture group; the first group holds
/// the digits.
pub fn compile_number_pattern(pattern: &str) -> ConfigResult<Regex> {
    let regex = Regex::new(pattern)?;
    if regex.captures_len() < 2 {
        return Err(ConfigError::Validation(format!(
            "number_pattern '{}' needs a capture group for the digits",
            pattern
        )));
    }
    Ok(regex)
}

/// A compiled selector together with its source text, for error messages
#[derive(Debug, Clone)]
struct NamedSelector {
    css: String,
    selector: Selector,
}

impl NamedSelector {
    fn new(css: &str) -> ConfigResult<Self> {
        Ok(Self {
            css: css.to_string(),
            selector: compile_selector(css)?,
        })
    }

    fn first<'a>(&self, scope: ElementRef<'a>) -> Result<ElementRef<'a>> {
        scope
            .select(&self.selector)
            .next()
            .ok_or_else(|| self.missing_element())
    }

    fn attr<'a>(&self, element: ElementRef<'a>, attribute: &str) -> Result<&'a str> {
        element
            .value()
            .attr(attribute)
            .ok_or_else(|| ScrapeError::MissingAttribute {
                selector: self.css.clone(),
                attribute: attribute.to_string(),
            })
    }

    fn missing_element(&self) -> ScrapeError {
        ScrapeError::MissingElement {
            selector: self.css.clone(),
        }
    }
}

/// Template driven by CSS selectors from [`TemplateConfig`]
///
/// With the default configuration this reads the blog layout:
///
/// - `li.pagination-last a` links to the last listing page
/// - each entry sits in a `div.entry-inner`
/// - the first `img` carries the image, its `data-srcset` lists sizes
///   and the URL is everything before `" 360w"`
/// - the first anchor in `div.entry-body` has the detail link (`href`)
///   and the entry title (`title`)
/// - `p.entry-body__text` holds the summary
#[derive(Debug, Clone)]
pub struct SelectorTemplate {
    pagination_last: NamedSelector,
    entry_container: Selector,
    image: NamedSelector,
    srcset_attribute: String,
    srcset_marker: String,
    body_link: NamedSelector,
    body_text: NamedSelector,
    number_pattern: Regex,
}

impl SelectorTemplate {
    /// Builds a template from configuration, compiling every selector once
    pub fn from_config(config: &TemplateConfig) -> ConfigResult<Self> {
        Ok(Self {
            pagination_last: NamedSelector::new(&config.pagination_last)?,
            entry_container: compile_selector(&config.entry_container)?,
            image: NamedSelector::new(&config.image)?,
            srcset_attribute: config.image_srcset_attribute.clone(),
            srcset_marker: config.image_srcset_marker.clone(),
            body_link: NamedSelector::new(&config.body_link)?,
            body_text: NamedSelector::new(&config.body_text)?,
            number_pattern: compile_number_pattern(&config.number_pattern)?,
        })
    }

    /// Builds the template for the default blog layout
    pub fn blog() -> ConfigResult<Self> {
        Self::from_config(&TemplateConfig::default())
    }

    /// Reads the image URL from the image element
    ///
    /// A missing image element is an error; an image without a source set
    /// yields `None`.
    fn image_url(&self, fragment: ElementRef<'_>) -> Result<Option<String>> {
        let image = self.image.first(fragment)?;
        Ok(image.value().attr(&self.srcset_attribute).map(|srcset| {
            srcset
                .split(self.srcset_marker.as_str())
                .next()
                .unwrap_or(srcset)
                .to_string()
        }))
    }

    /// Extracts the sequence number from a title
    ///
    /// A title containing the pattern prefix with no digits after it counts
    /// the same as a title without the pattern.
    pub fn sequence_number(&self, title: &str) -> Result<Option<u32>> {
        let digits = match self
            .number_pattern
            .captures(title)
            .and_then(|captures| captures.get(1))
        {
            Some(group) if !group.as_str().is_empty() => group.as_str(),
            _ => return Ok(None),
        };

        digits
            .parse::<u32>()
            .map(Some)
            .map_err(|_| ScrapeError::InvalidSequenceNumber {
                title: title.to_string(),
                value: digits.to_string(),
            })
    }
}

impl SiteTemplate for SelectorTemplate {
    fn last_page_href(&self, document: &Html) -> Result<String> {
        let link = self.pagination_last.first(document.root_element())?;
        let href = self.pagination_last.attr(link, "href")?;
        Ok(href.to_string())
    }

    fn entry_fragments<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        document.select(&self.entry_container).collect()
    }

    fn parse_entry(&self, fragment: ElementRef<'_>) -> Result<Entry> {
        let image_url = self.image_url(fragment)?;

        let link = self.body_link.first(fragment)?;
        let url = self.body_link.attr(link, "href")?.to_string();
        let title = self.body_link.attr(link, "title")?.to_string();

        let summary = self
            .body_text
            .first(fragment)?
            .text()
            .collect::<String>()
            .trim()
            .to_string();

        let number = self.sequence_number(&title)?;

        tracing::debug!("Parsed entry {:?} (number: {:?})", title, number);

        Ok(Entry::new(title, url, summary, image_url, number))
    }
}
