//! Bootstrap for the `ai_driven_development` database.
//!
//! [`seed::SEED`] holds the fixed objects to create, [`Bootstrapper`] writes
//! them through a [`Provisioner`](aidd_kernel::Provisioner), and
//! [`verify::verify`] checks what a run left behind.

pub mod bootstrap;
pub mod seed;
pub mod verify;

#[cfg(test)]
mod testing;

pub use bootstrap::{BootstrapOutcome, Bootstrapper};
pub use seed::SEED;
pub use verify::{verify, VerifyReport};
