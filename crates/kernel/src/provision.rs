use async_trait::async_trait;

use crate::seed::{UserRecord, UserSpec};

/// Write side of a bootstrap run.
///
/// Implementations forward each call to the data store and report its
/// outcome unchanged; duplicate handling is left to the store.
#[async_trait]
pub trait Provisioner: Send {
    /// Bind subsequent calls to the named database.
    async fn select_database(&mut self, name: &str) -> anyhow::Result<()>;

    /// Create a collection in the selected database.
    async fn create_collection(&mut self, name: &str) -> anyhow::Result<()>;

    /// Create a credential record in the selected database.
    async fn create_user(&mut self, user: &UserSpec<'_>) -> anyhow::Result<()>;
}

/// Read-only queries used to check what a bootstrap run left behind.
#[async_trait]
pub trait Inspector: Sync {
    async fn database_names(&self) -> anyhow::Result<Vec<String>>;

    async fn collection_names(&self, database: &str) -> anyhow::Result<Vec<String>>;

    async fn count_documents(&self, database: &str, collection: &str) -> anyhow::Result<u64>;

    /// Names of every user defined on `database`.
    async fn user_names(&self, database: &str) -> anyhow::Result<Vec<String>>;

    /// Look up a user defined on `database`; `None` when it does not exist.
    async fn user_info(&self, database: &str, user: &str) -> anyhow::Result<Option<UserRecord>>;
}
