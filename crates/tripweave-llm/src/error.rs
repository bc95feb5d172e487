use std::time::Duration;
use thiserror::Error;

/// The generation backend call failed or produced nothing usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("No API credential configured for the generation backend")]
    NoCredentials,

    #[error("Generation backend rejected the request: {detail}")]
    BackendRejected { status: Option<u16>, detail: String },

    #[error("Generation backend returned no usable text")]
    EmptyResponse,

    #[error("Generation request timed out after {0:?}")]
    Timeout(Duration),
}

impl GenerationError {
    pub fn reason(&self) -> &'static str {
        match self {
            GenerationError::NoCredentials => "no_credentials",
            GenerationError::BackendRejected { .. } => "backend_rejected",
            GenerationError::EmptyResponse => "empty_response",
            GenerationError::Timeout(_) => "timeout",
        }
    }
}

/// The model replied, but nothing in the reply could be salvaged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("No valid alternatives could be parsed from the response")]
    NoAlternatives,
}

impl ParseError {
    pub fn reason(&self) -> &'static str {
        match self {
            ParseError::NoAlternatives => "no_alternatives",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("API key is not configured (set TRIPWEAVE_API_KEY or OPENAI_API_KEY)")]
    MissingCredential,
}

/// Round-level failure of an advisory request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdviceError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Generation(GenerationError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl From<GenerationError> for AdviceError {
    fn from(e: GenerationError) -> Self {
        match e {
            GenerationError::NoCredentials => {
                AdviceError::Configuration(ConfigurationError::MissingCredential)
            }
            other => AdviceError::Generation(other),
        }
    }
}

impl AdviceError {
    /// Whether re-running the round from the same inputs can help.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, AdviceError::Configuration(_))
    }

    pub fn reason(&self) -> &'static str {
        match self {
            AdviceError::Configuration(_) => "no_credentials",
            AdviceError::Generation(e) => e.reason(),
            AdviceError::Parse(e) => e.reason(),
        }
    }
}
