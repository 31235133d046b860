use thiserror::Error;

#[derive(Debug, Error)]
pub enum SkillError {
    #[error("unrecognized intent: {0}")]
    UnrecognizedIntent(String),

    #[error("unsupported request type")]
    UnsupportedRequest,

    #[error("invalid application id: {actual}")]
    InvalidApplicationId { actual: String },
}

impl SkillError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnrecognizedIntent(_) => "unrecognized_intent",
            Self::UnsupportedRequest => "unsupported_request",
            Self::InvalidApplicationId { .. } => "invalid_application_id",
        }
    }
}
