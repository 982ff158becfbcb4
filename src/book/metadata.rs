//! Resolved per-book metadata and the generated description file.

use super::BookId;

/// Metadata for one book, joined from the media list and version map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookMetadata {
    /// Book identifier.
    pub id: BookId,
    /// Publisher id used in streaming paths.
    pub publisher_id: String,
    /// Current content version (always >= 1).
    pub version: u32,
    /// Book title.
    pub title: String,
    /// Author, when the API provides one.
    pub author: Option<String>,
}

impl BookMetadata {
    /// Renders the description file written next to primary-backend downloads.
    #[must_use]
    pub fn description_text(&self, area: &str) -> String {
        format!(
            "Name: {}\nAuthor: {}\nPublisher: {}\nBook Version: {}\nBook Area Code: {}\n",
            self.title,
            self.author.as_deref().unwrap_or(""),
            self.publisher_id,
            self.version,
            area
        )
    }
}
