use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type ReportResult<T> = Result<T, ReportError>;

/// Error taxonomy shared by the report store, the services and the menu.
#[derive(Debug)]
pub enum ReportError {
    /// Non-numeric or out-of-range user input, or a request that is not
    /// valid for the current menu screen.
    InvalidInput(String),
    /// A report file exists but does not have the expected layout.
    CorruptReport { path: PathBuf, reason: String },
    /// Reading or writing a report file failed at the I/O level.
    Persistence {
        path: PathBuf,
        source: Box<dyn Error + Send + Sync>,
    },
}

impl ReportError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::CorruptReport {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn persistence(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self::Persistence {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

impl Display for ReportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "invalid input: {message}"),
            Self::CorruptReport { path, reason } => {
                write!(f, "corrupt report `{}`: {reason}", path.display())
            }
            Self::Persistence { path, source } => {
                write!(f, "could not access report `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ReportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidInput(_) => None,
            Self::CorruptReport { .. } => None,
            Self::Persistence { source, .. } => Some(source.as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn persistence_exposes_io_source() {
        let err = ReportError::persistence(
            "relatorio_ocupacao_vagas_1_2024.xlsx",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("relatorio_ocupacao_vagas_1_2024.xlsx"));
        assert!(err.source().is_some());
    }

    #[test]
    fn invalid_input_has_no_source() {
        let err = ReportError::invalid_input("month must be between 1 and 12");
        assert!(err.is_invalid_input());
        assert!(err.source().is_none());
        assert_eq!(err.to_string(), "invalid input: month must be between 1 and 12");
    }
}
