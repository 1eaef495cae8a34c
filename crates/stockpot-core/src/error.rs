//! Error types for the stockpot core library.

use crate::types::GoodId;

/// Errors that can occur while configuring, simulating, or trading.
///
/// All error variants are marked with `#[non_exhaustive]` to allow
/// adding new error types without breaking changes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Input validation error
    #[error("Validation error: {message}")]
    Validation {
        /// Field or aspect that failed validation
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error (config files, report output)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Good not present in the market
    #[error("Good not found: {id}")]
    GoodNotFound {
        /// Good ID that was not found
        id: GoodId,
    },

    /// Not enough cash to cover a purchase, overhead included
    #[error("Insufficient funds: need ${needed:.2}, have ${available:.2}")]
    InsufficientFunds {
        /// Total cost of the order
        needed: f64,
        /// Cash on hand
        available: f64,
    },

    /// Selling more shares than held
    #[error("Insufficient stock of good {good}: requested {requested}, held {held}")]
    InsufficientStock {
        /// Good being sold
        good: GoodId,
        /// Shares requested
        requested: u64,
        /// Shares held
        held: u64,
    },

    /// Buying past the warehouse limit for a good
    #[error("Stock limit for good {good}: requested total {requested}, limit {limit}")]
    StockLimit {
        /// Good being bought
        good: GoodId,
        /// Holding size after the order
        requested: u64,
        /// Maximum holding allowed
        limit: u64,
    },
}

/// Convenience `Result` type alias for stockpot operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns whether this error was caused by caller input.
    ///
    /// User errors (bad parameters, unaffordable or oversized orders) can be
    /// fixed by changing the request; I/O and serialization errors cannot.
    pub fn is_user_error(&self) -> bool {
        match self {
            Error::Validation { .. } => true,
            Error::Config { .. } => true,
            Error::GoodNotFound { .. } => true,
            Error::InsufficientFunds { .. } => true,
            Error::InsufficientStock { .. } => true,
            Error::StockLimit { .. } => true,
            Error::Io(_) => false,
            Error::Serialization(_) => false,
        }
    }

    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a new validation error with a field name.
    pub fn validation_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}
