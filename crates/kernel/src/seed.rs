//! Declarative description of what a bootstrap run writes.

use std::fmt;

use serde::Deserialize;

/// A role granted to a user, scoped to one database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleGrant<'a> {
    pub role: &'a str,
    pub db: &'a str,
}

/// Credential record to create. The password is kept out of `Debug` and
/// `Display` output.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct UserSpec<'a> {
    pub user: &'a str,
    pub pwd: &'a str,
    pub roles: &'a [RoleGrant<'a>],
}

impl fmt::Debug for UserSpec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserSpec")
            .field("user", &self.user)
            .field("pwd", &"<redacted>")
            .field("roles", &self.roles)
            .finish()
    }
}

impl fmt::Display for UserSpec<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.user)?;
        for (i, grant) in self.roles.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}@{}", grant.role, grant.db)?;
        }
        write!(f, "]")
    }
}

/// The full set of objects a bootstrap run declares.
#[derive(Debug, Clone, Copy)]
pub struct Seed<'a> {
    pub database: &'a str,
    pub collections: &'a [&'a str],
    pub user: UserSpec<'a>,
}

impl<'a> Seed<'a> {
    /// Ordered provisioning steps: select the database, create each
    /// collection, then create the user.
    pub fn steps(&self) -> Vec<Step<'a>> {
        let mut steps = Vec::with_capacity(self.collections.len() + 2);
        steps.push(Step::SelectDatabase(self.database));
        steps.extend(self.collections.iter().copied().map(Step::CreateCollection));
        steps.push(Step::CreateUser(self.user));
        steps
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'a> {
    SelectDatabase(&'a str),
    CreateCollection(&'a str),
    CreateUser(UserSpec<'a>),
}

impl fmt::Display for Step<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::SelectDatabase(name) => write!(f, "select database {name}"),
            Step::CreateCollection(name) => write!(f, "create collection {name}"),
            Step::CreateUser(user) => write!(f, "create user {user}"),
        }
    }
}

/// A user as reported back by the server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    pub user: String,
    pub db: String,
    #[serde(default)]
    pub roles: Vec<RoleRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoleRecord {
    pub role: String,
    pub db: String,
}

impl UserRecord {
    pub fn has_grant(&self, grant: &RoleGrant<'_>) -> bool {
        self.roles
            .iter()
            .any(|r| r.role == grant.role && r.db == grant.db)
    }
}
