use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingVariables(Vec<String>),
}

impl ConfigurationError {
    pub fn missing(&self) -> &[String] {
        match self {
            Self::MissingVariables(names) => names,
        }
    }
}
