//! In-memory stand-in for a MongoDB deployment.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use aidd_kernel::{Inspector, Provisioner, RoleRecord, UserRecord, UserSpec};
use anyhow::{anyhow, bail};
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SelectDatabase(String),
    CreateCollection(String),
    CreateUser(String),
}

#[derive(Default)]
struct FakeDatabase {
    collections: BTreeMap<String, u64>,
    users: BTreeMap<String, UserRecord>,
}

#[derive(Default)]
struct State {
    databases: BTreeMap<String, FakeDatabase>,
    calls: Vec<Call>,
    failing_collections: BTreeSet<String>,
    idempotent_collections: bool,
}

/// Shared server state. Duplicate collections and users are rejected by
/// default, like a MongoDB server before 7.0.
#[derive(Clone, Default)]
pub struct FakeServer {
    state: Arc<Mutex<State>>,
}

impl FakeServer {
    pub fn fail_on_collection(self, name: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_collections
            .insert(name.to_string());
        self
    }

    /// Accept `createCollection` on an existing collection, like MongoDB 7.0+.
    pub fn idempotent_collections(self) -> Self {
        self.state.lock().unwrap().idempotent_collections = true;
        self
    }

    pub fn provisioner(&self) -> FakeProvisioner {
        FakeProvisioner {
            state: Arc::clone(&self.state),
            selected: None,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn insert_document(&self, database: &str, collection: &str) {
        let mut state = self.state.lock().unwrap();
        *state
            .databases
            .entry(database.to_string())
            .or_default()
            .collections
            .entry(collection.to_string())
            .or_default() += 1;
    }

    pub fn grant_role(&self, database: &str, user: &str, role: &str, role_db: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(record) = state
            .databases
            .get_mut(database)
            .and_then(|db| db.users.get_mut(user))
        {
            record.roles.push(RoleRecord {
                role: role.to_string(),
                db: role_db.to_string(),
            });
        }
    }

    pub fn revoke_roles(&self, database: &str, user: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(record) = state
            .databases
            .get_mut(database)
            .and_then(|db| db.users.get_mut(user))
        {
            record.roles.clear();
        }
    }
}

pub struct FakeProvisioner {
    state: Arc<Mutex<State>>,
    selected: Option<String>,
}

impl FakeProvisioner {
    fn selected(&self) -> anyhow::Result<String> {
        self.selected
            .clone()
            .ok_or_else(|| anyhow!("no database selected"))
    }
}

#[async_trait]
impl Provisioner for FakeProvisioner {
    async fn select_database(&mut self, name: &str) -> anyhow::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::SelectDatabase(name.to_string()));
        self.selected = Some(name.to_string());
        Ok(())
    }

    async fn create_collection(&mut self, name: &str) -> anyhow::Result<()> {
        let database = self.selected()?;
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateCollection(name.to_string()));

        if state.failing_collections.contains(name) {
            bail!("simulated failure creating {name}");
        }
        let idempotent = state.idempotent_collections;
        let db = state.databases.entry(database.clone()).or_default();
        if db.collections.contains_key(name) {
            if idempotent {
                return Ok(());
            }
            bail!("Collection {database}.{name} already exists");
        }
        db.collections.insert(name.to_string(), 0);
        Ok(())
    }

    async fn create_user(&mut self, user: &UserSpec<'_>) -> anyhow::Result<()> {
        let database = self.selected()?;
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateUser(user.user.to_string()));

        let db = state.databases.entry(database.clone()).or_default();
        if db.users.contains_key(user.user) {
            bail!("User \"{}@{database}\" already exists", user.user);
        }
        let roles = user
            .roles
            .iter()
            .map(|grant| RoleRecord {
                role: grant.role.to_string(),
                db: grant.db.to_string(),
            })
            .collect();
        db.users.insert(
            user.user.to_string(),
            UserRecord {
                user: user.user.to_string(),
                db: database,
                roles,
            },
        );
        Ok(())
    }
}

#[async_trait]
impl Inspector for FakeServer {
    async fn database_names(&self) -> anyhow::Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .databases
            .iter()
            .filter(|(_, db)| !db.collections.is_empty())
            .map(|(name, _)| name.clone())
            .collect())
    }

    async fn collection_names(&self, database: &str) -> anyhow::Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .databases
            .get(database)
            .map(|db| db.collections.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn count_documents(&self, database: &str, collection: &str) -> anyhow::Result<u64> {
        let state = self.state.lock().unwrap();
        Ok(state
            .databases
            .get(database)
            .and_then(|db| db.collections.get(collection).copied())
            .unwrap_or(0))
    }

    async fn user_names(&self, database: &str) -> anyhow::Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .databases
            .get(database)
            .map(|db| db.users.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn user_info(&self, database: &str, user: &str) -> anyhow::Result<Option<UserRecord>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .databases
            .get(database)
            .and_then(|db| db.users.get(user).cloned()))
    }
}
