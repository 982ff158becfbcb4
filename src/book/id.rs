//! Book identifier parsing and rendering.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Largest identifier the device file naming scheme can represent.
pub const MAX_BOOK_ID: u32 = 99_999;

/// Width of the zero-padded file id used in output filenames.
pub const FILE_ID_WIDTH: usize = 5;

/// Numeric book identifier shared by both backends.
///
/// Accepts zero-padded text (`"09550"`) as well as plain numbers. The value
/// is the only state; padding is applied when rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BookId(u32);

/// Errors returned when parsing a [`BookId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookIdError {
    /// Input was empty after trimming.
    #[error("book id is empty")]
    Empty,

    /// Input contained something other than ASCII digits.
    #[error("book id '{input}' is not numeric")]
    NotNumeric {
        /// The rejected input.
        input: String,
    },

    /// Input had more than five digits.
    #[error("book id '{input}' has more than 5 digits")]
    TooLong {
        /// The rejected input.
        input: String,
    },

    /// Input parsed to a value outside 1..=99999.
    #[error("book id {value} is out of range 1..=99999")]
    OutOfRange {
        /// The parsed value.
        value: u32,
    },
}

impl BookId {
    /// Creates an identifier from a numeric value.
    ///
    /// # Errors
    ///
    /// Returns [`BookIdError::OutOfRange`] for 0 or values above 99999.
    pub fn new(value: u32) -> Result<Self, BookIdError> {
        if value == 0 || value > MAX_BOOK_ID {
            return Err(BookIdError::OutOfRange { value });
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    /// Unpadded form used in API queries and URL path segments.
    #[must_use]
    pub fn unpadded(self) -> String {
        self.0.to_string()
    }

    /// Five-digit zero-padded form used for filenames.
    #[must_use]
    pub fn file_id(self) -> String {
        format!("{:0width$}", self.0, width = FILE_ID_WIDTH)
    }
}

impl FromStr for BookId {
    type Err = BookIdError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(BookIdError::Empty);
        }
        if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BookIdError::NotNumeric {
                input: trimmed.to_string(),
            });
        }
        if trimmed.len() > FILE_ID_WIDTH {
            return Err(BookIdError::TooLong {
                input: trimmed.to_string(),
            });
        }
        let value = trimmed
            .parse::<u32>()
            .map_err(|_| BookIdError::NotNumeric {
                input: trimmed.to_string(),
            })?;
        Self::new(value)
    }
}

impl TryFrom<u32> for BookId {
    type Error = BookIdError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
