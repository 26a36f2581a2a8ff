//! Persistence errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<bson::ser::Error> for PersistenceError {
    fn from(err: bson::ser::Error) -> Self {
        PersistenceError::Serialization(err.to_string())
    }
}

impl From<PersistenceError> for transdesk_core::Error {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Configuration(msg) => transdesk_core::Error::Configuration(msg),
            PersistenceError::Connection(msg) => transdesk_core::Error::Connection(msg),
            PersistenceError::DuplicateKey(_) => transdesk_core::Error::duplicate_key(),
            PersistenceError::Database(msg) | PersistenceError::Serialization(msg) => {
                transdesk_core::Error::Unknown(msg)
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transdesk_core::Error;

    #[test]
    fn test_core_error_mapping() {
        let err: Error = PersistenceError::DuplicateKey("greet".into()).into();
        assert!(matches!(err, Error::Conflict(_)));

        let err: Error = PersistenceError::Connection("refused".into()).into();
        assert!(matches!(err, Error::Connection(_)));

        let err: Error = PersistenceError::Configuration("no uri".into()).into();
        assert!(matches!(err, Error::Configuration(_)));

        let err: Error = PersistenceError::Database("boom".into()).into();
        assert!(matches!(err, Error::Unknown(_)));
    }
}
