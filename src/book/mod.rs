//! Book identity, metadata and on-device file naming.

mod id;
mod metadata;

pub use id::{BookId, BookIdError, FILE_ID_WIDTH, MAX_BOOK_ID};
pub use metadata::BookMetadata;

use std::path::{Path, PathBuf};

/// Default language/region tag used in every asset name and URL.
pub const DEFAULT_AREA: &str = "en";

/// The three files stored per book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    /// Text description (`.txt`).
    Description,
    /// Cover image (`.png`), optional.
    Thumbnail,
    /// Primary content (`.kii`), required.
    Data,
}

impl AssetKind {
    /// File extension without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Description => "txt",
            Self::Thumbnail => "png",
            Self::Data => "kii",
        }
    }

    /// Stable label for logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Description => "description",
            Self::Thumbnail => "thumbnail",
            Self::Data => "data",
        }
    }
}

/// Output paths of one book inside the device's `book/` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSet {
    description: PathBuf,
    thumbnail: PathBuf,
    data: PathBuf,
}

impl AssetSet {
    /// Builds `{fileId5}_{area}.{ext}` paths for `id` under `book_dir`.
    #[must_use]
    pub fn new(book_dir: &Path, id: BookId, area: &str) -> Self {
        let stem = format!("{}_{area}", id.file_id());
        Self {
            description: book_dir.join(format!("{stem}.{}", AssetKind::Description.extension())),
            thumbnail: book_dir.join(format!("{stem}.{}", AssetKind::Thumbnail.extension())),
            data: book_dir.join(format!("{stem}.{}", AssetKind::Data.extension())),
        }
    }

    /// Path for a single asset.
    #[must_use]
    pub fn path(&self, kind: AssetKind) -> &Path {
        match kind {
            AssetKind::Description => &self.description,
            AssetKind::Thumbnail => &self.thumbnail,
            AssetKind::Data => &self.data,
        }
    }

    /// Whether the data file is already on disk.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.data.is_file()
    }

    /// Removes every file of this set that exists. Missing files are ignored.
    pub async fn remove_all(&self) {
        for path in [&self.description, &self.thumbnail, &self.data] {
            match tokio::fs::remove_file(path).await {
                Ok(()) => tracing::debug!(path = %path.display(), "removed partial asset"),
                Err(error) if error.kind() == std::io::ErrorKind::NotFound => {}
                Err(error) => {
                    tracing::warn!(path = %path.display(), error = %error, "failed to remove partial asset");
                }
            }
        }
    }
}
