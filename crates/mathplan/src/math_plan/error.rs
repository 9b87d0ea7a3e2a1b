//! Error types for the math plan subsystem.
//!
//! Only loading the catalog and resolving a request can fail. Computing a plan from resolved
//! majors never does.

use thiserror::Error;

/// Errors that can occur while loading the catalog or resolving a plan request.
#[derive(Debug, Error, Clone)]
pub enum MathPlanError {
    /// Reading the catalog from disk failed
    #[error("Catalog I/O error: {message}")]
    CatalogIo { message: String },

    /// A catalog file could not be parsed
    #[error("Failed to parse catalog file {file}: {message}")]
    CatalogParse { file: String, message: String },

    /// Two majors claim the same question number or program code
    #[error("Duplicate major identifier in catalog: {id}")]
    DuplicateMajor { id: String },

    /// The catalog loaded but holds no majors
    #[error("Catalog contains no majors")]
    EmptyCatalog,

    /// A request named a major the catalog doesn't know
    #[error("Unknown major: {id}")]
    UnknownMajor { id: String },

    /// A request was malformed
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },
}

impl MathPlanError {
    /// Returns true if the caller sent something we can't use.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            MathPlanError::UnknownMajor { .. } | MathPlanError::InvalidRequest { .. }
        )
    }

    /// Returns true if this error came from loading the catalog.
    pub fn is_catalog_error(&self) -> bool {
        matches!(
            self,
            MathPlanError::CatalogIo { .. }
                | MathPlanError::CatalogParse { .. }
                | MathPlanError::DuplicateMajor { .. }
                | MathPlanError::EmptyCatalog
        )
    }
}

impl From<std::io::Error> for MathPlanError {
    fn from(err: std::io::Error) -> Self {
        MathPlanError::CatalogIo {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for MathPlanError {
    fn from(err: serde_json::Error) -> Self {
        MathPlanError::CatalogParse {
            file: "<inline>".to_string(),
            message: err.to_string(),
        }
    }
}
