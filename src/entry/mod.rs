//! Blog entries and their extraction
//!
//! This module contains:
//! - The [`Entry`] record produced for every listed post
//! - The [`SiteTemplate`] strategy that extracts entries from markup
//! - Conversion of entries into the ordered export table

mod table;
mod template;

pub use table::{entries_to_table, EntryRow, EntryTable};
pub use template::{compile_number_pattern, compile_selector, SelectorTemplate, SiteTemplate};

use crate::Result;
use scraper::Html;

/// Placeholder written when an entry has no image source set
pub const NO_IMAGE: &str = "no image";

/// Placeholder written when a title carries no sequence number
pub const NO_NUMBER: &str = "none";

/// One blog post as listed in the catalogue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    title: String,
    url: String,
    summary: String,
    image_url: Option<String>,
    number: Option<u32>,
}

impl Entry {
    /// Creates an entry from already extracted fields
    pub fn new(
        title: String,
        url: String,
        summary: String,
        image_url: Option<String>,
        number: Option<u32>,
    ) -> Self {
        Self {
            title,
            url,
            summary,
            image_url,
            number,
        }
    }

    /// Parses one entry from the markup of its container
    ///
    /// # Example
    ///
    /// ```
    /// use mnamky::entry::{Entry, SelectorTemplate};
    ///
    /// let html = r#"<div class="entry-inner">
    ///     <img data-srcset="https://cdn.example.com/pie.jpg 360w">
    ///     <div class="entry-body">
    ///         <a href="https://example.com/pie" title="Mňamka #3: Pie">Pie</a>
    ///         <p class="entry-body__text"> Warm pie. </p>
    ///     </div>
    /// </div>"#;
    ///
    /// let template = SelectorTemplate::blog().unwrap();
    /// let entry = Entry::from_fragment(html, &template).unwrap();
    /// assert_eq!(entry.number(), Some(3));
    /// assert_eq!(entry.summary(), "Warm pie.");
    /// ```
    pub fn from_fragment(markup: &str, template: &dyn SiteTemplate) -> Result<Self> {
        let fragment = Html::parse_fragment(markup);
        template.parse_entry(fragment.root_element())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Link to the full post
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn number(&self) -> Option<u32> {
        self.number
    }

    /// Key used to order the export; unnumbered entries sort as 0
    pub fn sort_key(&self) -> u32 {
        self.number.unwrap_or(0)
    }

    /// Returns the entry as an ordered field mapping
    ///
    /// Fields are `title`, `summary`, `url`, `img_url` and `number`, with
    /// the placeholders [`NO_IMAGE`] and [`NO_NUMBER`] for missing values.
    pub fn to_mapping(&self) -> Vec<(&'static str, String)> {
        vec![
            ("title", self.title.clone()),
            ("summary", self.summary.clone()),
            ("url", self.url.clone()),
            ("img_url", self.image_url_or_placeholder().to_string()),
            (
                "number",
                self.number
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| NO_NUMBER.to_string()),
            ),
        ]
    }

    pub(crate) fn image_url_or_placeholder(&self) -> &str {
        self.image_url.as_deref().unwrap_or(NO_IMAGE)
    }
}
