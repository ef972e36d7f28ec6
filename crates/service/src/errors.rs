use models::errors::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid owner: user {0} does not exist")]
    InvalidOwner(String),
    #[error("invalid item: item {0} does not exist")]
    InvalidItem(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ServiceError::Validation(msg),
        }
    }
}

impl ServiceError {
    pub fn not_found(entity: &str, id: &str) -> Self { Self::NotFound(format!("{entity} {id} not found")) }

    pub fn storage(e: impl std::fmt::Display) -> Self { Self::Storage(e.to_string()) }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::NotFound(_) => 1003,
            ServiceError::InvalidOwner(_) => 1011,
            ServiceError::InvalidItem(_) => 1012,
            ServiceError::Storage(_) => 1200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct_per_kind() {
        let errs = [
            ServiceError::not_found("user", "u1"),
            ServiceError::InvalidOwner("u1".into()),
            ServiceError::InvalidItem("i1".into()),
            ServiceError::storage("disk full"),
            ServiceError::Validation("bad".into()),
        ];
        let mut codes: Vec<u16> = errs.iter().map(ServiceError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errs.len());
    }

    #[test]
    fn model_errors_become_validation_errors() {
        let e: ServiceError = ModelError::Validation("pseudo required".into()).into();
        assert!(matches!(&e, ServiceError::Validation(msg) if msg == "pseudo required"));
        assert_eq!(e.code(), 1001);
        assert_eq!(e.to_string(), "validation error: pseudo required");
    }

    #[test]
    fn messages_name_the_missing_reference() {
        assert_eq!(ServiceError::not_found("slot", "s9").to_string(), "not found: slot s9 not found");
        assert_eq!(ServiceError::InvalidItem("i2".into()).to_string(), "invalid item: item i2 does not exist");
    }
}
