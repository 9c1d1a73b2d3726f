use aidd_kernel::{RoleGrant, Seed, UserSpec};

pub const DATABASE: &str = "ai_driven_development";
pub const COLLECTIONS: &[&str] = &["users", "tasks"];

const ADMIN_ROLES: &[RoleGrant<'static>] = &[RoleGrant {
    role: "readWrite",
    db: DATABASE,
}];

// Local development credentials; the container is not meant to be exposed.
pub const ADMIN: UserSpec<'static> = UserSpec {
    user: "admin",
    pwd: "admin123",
    roles: ADMIN_ROLES,
};

pub const SEED: Seed<'static> = Seed {
    database: DATABASE,
    collections: COLLECTIONS,
    user: ADMIN,
};
