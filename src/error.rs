use thiserror::Error;

use crate::models::LogEntryKind;

/// Failures raised while turning a markup fragment into a record.
///
/// Unrecognized log sentences are not errors; they become
/// [`LogEntryKind::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("malformed markup: {reason}")]
    MalformedMarkup { reason: String },

    #[error("unknown status indicator: {text:?}")]
    UnknownStatus { text: String },

    #[error("log sentence classified as {kind:?} does not match its template: {text:?}")]
    TemplateMismatch { kind: LogEntryKind, text: String },

    #[error("missing required element: {element}")]
    MissingRequiredElement { element: String },
}

impl ExtractError {
    pub(crate) fn missing(element: impl Into<String>) -> Self {
        Self::MissingRequiredElement {
            element: element.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractError>;
