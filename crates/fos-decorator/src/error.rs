//! Decoration errors

use crate::repository::RepositoryError;

/// Result type for decoration and materialization
pub type Result<T> = std::result::Result<T, DecoratorError>;

/// Fatal errors of one composition
///
/// A placeholder without a matching fragment is not an error: it keeps the
/// layout's own content.
#[derive(Debug, thiserror::Error)]
pub enum DecoratorError {
    #[error("Configuration error in {template} at <{element}>: {message}")]
    Configuration {
        template: String,
        element: String,
        message: String,
    },

    #[error("Reference '{reference}' used by {template} could not be found")]
    ReferenceNotFound { template: String, reference: String },

    #[error("Cyclic decorator chain: {}", .chain.join(" -> "))]
    CyclicDecorator { chain: Vec<String> },

    #[error("Cyclic include chain: {}", .chain.join(" -> "))]
    CyclicInclude { chain: Vec<String> },

    #[error("Failed to load template {template}: {source}")]
    Repository {
        template: String,
        #[source]
        source: RepositoryError,
    },
}

impl DecoratorError {
    pub(crate) fn configuration(template: &str, element: &str, message: impl Into<String>) -> Self {
        Self::Configuration {
            template: template.to_string(),
            element: element.to_string(),
            message: message.into(),
        }
    }

    /// Map a repository failure, turning a miss into `ReferenceNotFound`
    pub(crate) fn from_repository(template: &str, reference: &str, error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound { .. } => Self::ReferenceNotFound {
                template: template.to_string(),
                reference: reference.to_string(),
            },
            other => Self::Repository {
                template: reference.to_string(),
                source: other,
            },
        }
    }
}
