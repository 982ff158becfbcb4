//! HTTP transport for API calls and asset downloads.
//!
//! # Features
//!
//! - Text and typed JSON GET requests
//! - Streaming downloads straight into the target file
//! - Partial-file removal when a transfer fails
//! - Optional progress bar for large transfers
//! - Configurable timeouts (30s connect, 5min read by default)
//!
//! # Example
//!
//! ```no_run
//! use pen_downloader_core::download::{HttpClient, ProgressMode};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let bytes = client
//!     .download_to_path(
//!         "https://example.com/00001_en.kii",
//!         Path::new("./book/00001_en.kii"),
//!         ProgressMode::Hidden,
//!     )
//!     .await?;
//! println!("Downloaded {bytes} bytes");
//! # Ok(())
//! # }
//! ```

mod client;
pub mod constants;
mod error;
mod progress;

pub use client::HttpClient;
pub use error::DownloadError;
pub use progress::ProgressMode;
