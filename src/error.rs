use std::{error, fmt};

/// Startup-level error: a message plus an optional underlying cause.
///
/// Cycle-level failures use the tagged enums of their components
/// (`FetchError`, `ParseError`, `PushError`) instead.
pub struct Error {
    message: String,
    source: Option<Box<dyn error::Error>>,
}

impl Error {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.source {
            Some(err) => write!(f, "{}: {}", self.message, err),
            None => write!(f, "{}", self.message),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self.source {
            Some(ref err) => Some(&**err),
            None => None,
        }
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Self {
            message,
            source: None,
        }
    }
}

impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }
}

impl<E: error::Error + 'static> From<(String, E)> for Error {
    fn from((message, err): (String, E)) -> Self {
        Self {
            message,
            source: Some(Box::new(err)),
        }
    }
}

impl<E: error::Error + 'static> From<(&str, E)> for Error {
    fn from((message, err): (&str, E)) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(err)),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_display_with_source() {
        let err = Error::from((
            "cannot bind metrics port",
            io::Error::new(io::ErrorKind::AddrInUse, "address in use"),
        ));
        assert_eq!(err.message(), "cannot bind metrics port");
        assert_eq!(format!("{}", err), "cannot bind metrics port: address in use");
        assert!(error::Error::source(&err).is_some());
    }

    #[test]
    fn test_display_without_source() {
        let err = Error::from("boom");
        assert_eq!(format!("{}", err), "boom");
        assert!(error::Error::source(&err).is_none());
    }
}
