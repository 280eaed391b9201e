use crate::entry::Entry;
use serde::Serialize;

/// One exported row; the sequence number only drives ordering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRow {
    pub title: String,
    pub summary: String,
    pub url: String,
    pub img_url: String,
}

impl From<&Entry> for EntryRow {
    fn from(entry: &Entry) -> Self {
        Self {
            title: entry.title().to_string(),
            summary: entry.summary().to_string(),
            url: entry.url().to_string(),
            img_url: entry.image_url_or_placeholder().to_string(),
        }
    }
}

/// Entries ordered for export
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryTable {
    rows: Vec<EntryRow>,
}

impl EntryTable {
    /// Column names in output order
    pub const COLUMNS: [&'static str; 4] = ["title", "summary", "url", "img_url"];

    pub fn rows(&self) -> &[EntryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Orders entries by sequence number and drops the number column
///
/// Unnumbered entries sort as 0, so they come first. The sort is stable:
/// entries with equal keys keep their crawl order.
pub fn entries_to_table(entries: &[Entry]) -> EntryTable {
    let mut ordered: Vec<&Entry> = entries.iter().collect();
    ordered.sort_by_key(|entry| entry.sort_key());

    EntryTable {
        rows: ordered.into_iter().map(EntryRow::from).collect(),
    }
}
