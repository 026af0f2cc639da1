use std::error::Error;
use std::fmt;

/// A failed read, write or delete of the stored OpenRouter key.
///
/// `Recoverable` covers a locked or unreachable backend, where setting
/// `OPENROUTER_API_KEY` is a way around it. Everything else is `Permanent`.
#[derive(Debug)]
pub enum KeyringAccessError {
    Recoverable(keyring::Error),
    Permanent(keyring::Error),
}

impl KeyringAccessError {
    fn inner(&self) -> &keyring::Error {
        match self {
            KeyringAccessError::Recoverable(err) | KeyringAccessError::Permanent(err) => err,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, KeyringAccessError::Recoverable(_))
    }
}

impl From<keyring::Error> for KeyringAccessError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::PlatformFailure(_) | keyring::Error::NoStorageAccess(_) => {
                KeyringAccessError::Recoverable(err)
            }
            other => KeyringAccessError::Permanent(other),
        }
    }
}

impl fmt::Display for KeyringAccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner())
    }
}

impl Error for KeyringAccessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_failures_are_recoverable() {
        let err = KeyringAccessError::from(keyring::Error::PlatformFailure("locked".into()));
        assert!(err.is_recoverable());
        assert!(err.source().is_some());
    }

    #[test]
    fn other_failures_are_permanent() {
        let err = KeyringAccessError::from(keyring::Error::TooLong("user".to_string(), 10));
        assert!(!err.is_recoverable());
    }
}
