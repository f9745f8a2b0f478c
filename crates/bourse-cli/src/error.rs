use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
///
/// `DataUnavailable` is not one of them: it is reported inside the
/// envelope and turns into exit code 3 after rendering.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] bourse_core::ValidationError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Directory(#[from] bourse_core::DirectoryError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Config(_) => 2,
            Self::Serialization(_) => 4,
            Self::Directory(_) => 10,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_category() {
        assert_eq!(
            CliError::Validation(bourse_core::ValidationError::EmptySymbol).exit_code(),
            2
        );
        assert_eq!(CliError::Config(String::from("missing")).exit_code(), 2);
        assert_eq!(
            CliError::Io(std::io::Error::other("broken pipe")).exit_code(),
            10
        );

        let serde_error = serde_json::from_str::<u8>("nope").expect_err("invalid json");
        assert_eq!(CliError::Serialization(serde_error).exit_code(), 4);
    }
}
