use aidd_kernel::{Provisioner, Seed, Step};
use anyhow::Context;

/// Summary of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapOutcome {
    pub applied: usize,
}

/// Applies a [`Seed`] as a fixed, ordered list of provisioning calls.
///
/// There is no pre-existence check and no retry: the first failing call
/// aborts the run and its error is returned with the step attached.
pub struct Bootstrapper<P> {
    provisioner: P,
}

impl<P: Provisioner> Bootstrapper<P> {
    pub fn new(provisioner: P) -> Self {
        Self { provisioner }
    }

    pub fn into_inner(self) -> P {
        self.provisioner
    }

    pub async fn run(&mut self, seed: &Seed<'_>) -> anyhow::Result<BootstrapOutcome> {
        let steps = seed.steps();
        tracing::info!(
            database = seed.database,
            steps = steps.len(),
            "bootstrap starting"
        );

        for (index, step) in steps.iter().enumerate() {
            tracing::info!(step = index + 1, "{step}");
            self.apply(step)
                .await
                .with_context(|| format!("bootstrap step {} failed: {step}", index + 1))?;
        }

        tracing::info!(database = seed.database, "bootstrap complete");
        Ok(BootstrapOutcome {
            applied: steps.len(),
        })
    }

    async fn apply(&mut self, step: &Step<'_>) -> anyhow::Result<()> {
        match step {
            Step::SelectDatabase(name) => self.provisioner.select_database(name).await,
            Step::CreateCollection(name) => self.provisioner.create_collection(name).await,
            Step::CreateUser(user) => self.provisioner.create_user(user).await,
        }
    }
}
