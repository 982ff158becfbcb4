//! Layout of the mounted pen: `book/` for downloads, `configure/` for the
//! pending queue.

use std::path::{Path, PathBuf};

use crate::batch::{PendingQueue, RunError};

/// Download target directory below the root.
pub const BOOK_DIR: &str = "book";

/// Configuration directory below the root.
pub const CONFIGURE_DIR: &str = "configure";

/// Pending queue file inside [`CONFIGURE_DIR`].
pub const PENDING_QUEUE_FILE: &str = "tbd.txt";

/// A validated device root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRoot {
    root: PathBuf,
}

impl DeviceRoot {
    /// Checks that `root` and `root/book` are directories.
    ///
    /// # Errors
    ///
    /// [`RunError::MissingRoot`] or [`RunError::MissingBookDir`].
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, RunError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(RunError::missing_root(root));
        }
        let book_dir = root.join(BOOK_DIR);
        if !book_dir.is_dir() {
            return Err(RunError::missing_book_dir(book_dir));
        }
        Ok(Self { root })
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The `book/` download directory.
    #[must_use]
    pub fn book_dir(&self) -> PathBuf {
        self.root.join(BOOK_DIR)
    }

    /// The pending queue file, which may not exist yet.
    #[must_use]
    pub fn pending_queue(&self) -> PendingQueue {
        PendingQueue::new(self.root.join(CONFIGURE_DIR).join(PENDING_QUEUE_FILE))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_valid_root() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("book")).unwrap();

        let device = DeviceRoot::open(dir.path()).unwrap();
        assert_eq!(device.book_dir(), dir.path().join("book"));
        assert_eq!(
            device.pending_queue().path(),
            dir.path().join("configure").join("tbd.txt")
        );
    }

    #[test]
    fn test_open_missing_root() {
        let dir = TempDir::new().unwrap();
        let result = DeviceRoot::open(dir.path().join("absent"));
        assert!(matches!(result, Err(RunError::MissingRoot { .. })));
    }

    #[test]
    fn test_open_missing_book_dir() {
        let dir = TempDir::new().unwrap();
        let result = DeviceRoot::open(dir.path());
        assert!(matches!(result, Err(RunError::MissingBookDir { .. })));
    }
}
