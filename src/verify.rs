//! Read-only check of the state a bootstrap run should leave behind.

use aidd_kernel::{Inspector, Seed};
use anyhow::Context;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionStatus {
    pub name: String,
    pub exists: bool,
    pub documents: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleStatus {
    pub role: String,
    pub db: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub database: String,
    pub database_exists: bool,
    pub collections: Vec<CollectionStatus>,
    /// Collections present in the database that the seed does not declare.
    pub unexpected_collections: Vec<String>,
    pub user: String,
    pub user_present: bool,
    pub user_roles: Vec<RoleStatus>,
    pub missing_roles: Vec<RoleStatus>,
    /// Roles held by the seeded user beyond the declared grants.
    pub extra_roles: Vec<RoleStatus>,
    /// Users defined on the database other than the seeded one.
    pub unexpected_users: Vec<String>,
}

impl VerifyReport {
    pub fn is_satisfied(&self) -> bool {
        self.database_exists
            && self
                .collections
                .iter()
                .all(|c| c.exists && c.documents == 0)
            && self.unexpected_collections.is_empty()
            && self.user_present
            && self.missing_roles.is_empty()
            && self.extra_roles.is_empty()
            && self.unexpected_users.is_empty()
    }

    /// Human readable lines describing each property, `ok` or `FAIL` first.
    pub fn lines(&self) -> Vec<String> {
        fn mark(ok: bool) -> &'static str {
            if ok {
                "ok  "
            } else {
                "FAIL"
            }
        }

        let mut lines = vec![format!(
            "{} database {} exists",
            mark(self.database_exists),
            self.database
        )];
        for c in &self.collections {
            lines.push(format!(
                "{} collection {} exists and is empty ({} documents)",
                mark(c.exists && c.documents == 0),
                c.name,
                c.documents
            ));
        }
        for name in &self.unexpected_collections {
            lines.push(format!("{} unexpected collection {}", mark(false), name));
        }
        lines.push(format!(
            "{} user {} exists",
            mark(self.user_present),
            self.user
        ));
        for role in &self.missing_roles {
            lines.push(format!(
                "{} user {} missing role {}@{}",
                mark(false),
                self.user,
                role.role,
                role.db
            ));
        }
        for role in &self.extra_roles {
            lines.push(format!(
                "{} user {} has undeclared role {}@{}",
                mark(false),
                self.user,
                role.role,
                role.db
            ));
        }
        for name in &self.unexpected_users {
            lines.push(format!("{} unexpected user {}", mark(false), name));
        }
        lines
    }
}

/// Query `inspector` for every object `seed` declares. Never writes.
pub async fn verify<I: Inspector>(seed: &Seed<'_>, inspector: &I) -> anyhow::Result<VerifyReport> {
    let databases = inspector
        .database_names()
        .await
        .context("failed to list databases")?;
    let database_exists = databases.iter().any(|name| name == seed.database);

    let present = inspector
        .collection_names(seed.database)
        .await
        .with_context(|| format!("failed to list collections of {}", seed.database))?;

    let mut collections = Vec::with_capacity(seed.collections.len());
    for &name in seed.collections {
        let exists = present.iter().any(|p| p == name);
        let documents = if exists {
            inspector
                .count_documents(seed.database, name)
                .await
                .with_context(|| format!("failed to count documents in {name}"))?
        } else {
            0
        };
        collections.push(CollectionStatus {
            name: name.to_string(),
            exists,
            documents,
        });
    }

    let mut unexpected_collections: Vec<String> = present
        .into_iter()
        .filter(|p| !seed.collections.contains(&p.as_str()) && !p.starts_with("system."))
        .collect();
    unexpected_collections.sort();

    let record = inspector
        .user_info(seed.database, seed.user.user)
        .await
        .with_context(|| format!("failed to look up user {}", seed.user.user))?;

    let user_roles: Vec<RoleStatus> = record
        .as_ref()
        .map(|r| {
            r.roles
                .iter()
                .map(|role| RoleStatus {
                    role: role.role.clone(),
                    db: role.db.clone(),
                })
                .collect()
        })
        .unwrap_or_default();

    let declared = |role: &RoleStatus| {
        seed.user
            .roles
            .iter()
            .any(|grant| grant.role == role.role && grant.db == role.db)
    };
    let extra_roles = user_roles
        .iter()
        .filter(|role| !declared(*role))
        .cloned()
        .collect();

    let mut unexpected_users: Vec<String> = inspector
        .user_names(seed.database)
        .await
        .with_context(|| format!("failed to list users of {}", seed.database))?
        .into_iter()
        .filter(|name| name != seed.user.user)
        .collect();
    unexpected_users.sort();

    let missing_roles = seed
        .user
        .roles
        .iter()
        .filter(|grant| !record.as_ref().is_some_and(|r| r.has_grant(grant)))
        .map(|grant| RoleStatus {
            role: grant.role.to_string(),
            db: grant.db.to_string(),
        })
        .collect();

    let report = VerifyReport {
        database: seed.database.to_string(),
        database_exists,
        collections,
        unexpected_collections,
        user: seed.user.user.to_string(),
        user_present: record.is_some(),
        user_roles,
        missing_roles,
        extra_roles,
        unexpected_users,
    };
    tracing::debug!(satisfied = report.is_satisfied(), "verification finished");
    Ok(report)
}
