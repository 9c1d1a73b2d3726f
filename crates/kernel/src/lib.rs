pub mod provision;
pub mod seed;
pub mod settings;

pub use provision::{Inspector, Provisioner};
pub use seed::{RoleGrant, RoleRecord, Seed, Step, UserRecord, UserSpec};
