use thiserror::Error;

#[derive(Debug, Error)]
pub enum HfError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Hugging Face API key is required")]
    MissingCredential,
    #[error("Invalid prompt: {0}")]
    InvalidPrompt(String),
    #[error("Request error: {0}")]
    RequestError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// The credential was rejected; carries the already formatted candidate message.
    #[error("{0}")]
    Unauthorized(String),
    #[error("{}", format_exhausted(.0))]
    AllModelsFailed(Vec<String>),
}

impl HfError {
    /// Per-candidate messages collected before every candidate was exhausted.
    pub fn candidate_errors(&self) -> &[String] {
        match self {
            HfError::AllModelsFailed(errors) => errors,
            _ => &[],
        }
    }
}

fn format_exhausted(errors: &[String]) -> String {
    let lines: Vec<String> = errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("{}. {}", i + 1, err))
        .collect();
    format!(
        "All models failed to generate image. Errors:\n{}",
        lines.join("\n")
    )
}

pub type Result<T> = std::result::Result<T, HfError>;
