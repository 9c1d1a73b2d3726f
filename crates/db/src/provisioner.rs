use aidd_kernel::{Inspector, Provisioner, UserRecord, UserSpec};
use async_trait::async_trait;
use mongodb::{
    bson::{doc, Bson, Document},
    Client, Database,
};
use serde::Deserialize;
use tracing::debug;

use crate::error::DbError;

/// Issues provisioning calls against a live MongoDB deployment.
///
/// Every call maps to exactly one server command; errors are returned as the
/// server reported them.
pub struct MongoProvisioner {
    client: Client,
    database: Option<Database>,
}

impl MongoProvisioner {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            database: None,
        }
    }

    fn selected(&self) -> Result<&Database, DbError> {
        self.database.as_ref().ok_or(DbError::NoDatabaseSelected)
    }
}

#[async_trait]
impl Provisioner for MongoProvisioner {
    async fn select_database(&mut self, name: &str) -> anyhow::Result<()> {
        debug!(database = name, "selecting database");
        // Databases are created lazily by the server on first write.
        self.database = Some(self.client.database(name));
        Ok(())
    }

    async fn create_collection(&mut self, name: &str) -> anyhow::Result<()> {
        let db = self.selected()?;
        debug!(database = db.name(), collection = name, "creating collection");
        db.create_collection(name).await.map_err(DbError::from)?;
        Ok(())
    }

    async fn create_user(&mut self, user: &UserSpec<'_>) -> anyhow::Result<()> {
        let db = self.selected()?;
        debug!(database = db.name(), user = user.user, "creating user");
        db.run_command(create_user_command(user))
            .await
            .map_err(DbError::from)?;
        Ok(())
    }
}

fn create_user_command(user: &UserSpec<'_>) -> Document {
    let roles: Vec<Bson> = user
        .roles
        .iter()
        .map(|grant| Bson::Document(doc! { "role": grant.role, "db": grant.db }))
        .collect();

    doc! {
        "createUser": user.user,
        "pwd": user.pwd,
        "roles": roles,
    }
}

/// Read-only view over a MongoDB deployment.
pub struct MongoInspector {
    client: Client,
}

impl MongoInspector {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct UsersInfoReply {
    #[serde(default)]
    users: Vec<UserRecord>,
}

#[async_trait]
impl Inspector for MongoInspector {
    async fn database_names(&self) -> anyhow::Result<Vec<String>> {
        let names = self
            .client
            .list_database_names()
            .await
            .map_err(DbError::from)?;
        Ok(names)
    }

    async fn collection_names(&self, database: &str) -> anyhow::Result<Vec<String>> {
        let names = self
            .client
            .database(database)
            .list_collection_names()
            .await
            .map_err(DbError::from)?;
        Ok(names)
    }

    async fn count_documents(&self, database: &str, collection: &str) -> anyhow::Result<u64> {
        let count = self
            .client
            .database(database)
            .collection::<Document>(collection)
            .count_documents(doc! {})
            .await
            .map_err(DbError::from)?;
        Ok(count)
    }

    async fn user_names(&self, database: &str) -> anyhow::Result<Vec<String>> {
        let reply = self
            .client
            .database(database)
            .run_command(doc! { "usersInfo": 1 })
            .await
            .map_err(DbError::from)?;
        let reply: UsersInfoReply =
            mongodb::bson::from_document(reply).map_err(DbError::from)?;
        Ok(reply.users.into_iter().map(|record| record.user).collect())
    }

    async fn user_info(&self, database: &str, user: &str) -> anyhow::Result<Option<UserRecord>> {
        let reply = self
            .client
            .database(database)
            .run_command(doc! { "usersInfo": user })
            .await
            .map_err(DbError::from)?;
        let reply: UsersInfoReply =
            mongodb::bson::from_document(reply).map_err(DbError::from)?;
        Ok(reply.users.into_iter().find(|record| record.user == user))
    }
}
