use thiserror::Error;

pub type Result<T, E = KnowledgeError> = core::result::Result<T, E>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KnowledgeError {
    #[error("no page found for topic")]
    NotFound,
    #[error("topic is ambiguous")]
    Ambiguous,
    #[error("service unavailable: {0}")]
    Unavailable(String),
}
