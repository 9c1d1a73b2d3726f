//! MongoDB access for the bootstrap: client factory plus the provisioner and
//! inspector implementations.

pub mod client;
pub mod error;
pub mod provisioner;

pub use client::connect;
pub use error::DbError;
pub use provisioner::{MongoInspector, MongoProvisioner};
