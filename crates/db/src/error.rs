use mongodb::error::ErrorKind;
use thiserror::Error;

/// Server error code for `createCollection` on an existing namespace.
pub const NAMESPACE_EXISTS: i32 = 48;
/// Server error code for `createUser` on an existing user.
pub const USER_ALREADY_EXISTS: i32 = 51003;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("mongodb error: {0}")]
    Driver(#[from] mongodb::error::Error),

    #[error("failed to decode server reply: {0}")]
    Decode(#[from] mongodb::bson::de::Error),

    #[error("no database selected")]
    NoDatabaseSelected,
}

impl DbError {
    /// Whether the server rejected a create because the target already exists.
    pub fn is_already_exists(&self) -> bool {
        match self {
            DbError::Driver(err) => match err.kind.as_ref() {
                ErrorKind::Command(command) => {
                    command.code == NAMESPACE_EXISTS || command.code == USER_ALREADY_EXISTS
                }
                _ => false,
            },
            _ => false,
        }
    }

    /// Find the first `DbError` in an error chain.
    pub fn find(err: &anyhow::Error) -> Option<&DbError> {
        err.chain().find_map(|cause| cause.downcast_ref::<DbError>())
    }
}
