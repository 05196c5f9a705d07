// ABOUTME: Deployer collaborator trait.
// ABOUTME: Performs the actual orchestrator deployment of a finished job.

use crate::types::Job;
use async_trait::async_trait;
use std::collections::HashSet;

/// Deploys a finished job to an orchestrator.
///
/// Implementations own networking, retries, readiness polling for the
/// ports in `wait_ports`, and teardown of what they deploy. A builder calls
/// `deploy` at most once per successful deployment and never translates the
/// returned error.
#[async_trait]
pub trait Deployer: Send + Sync {
    /// Handle to the running job.
    type Handle: Send + Sync;

    type Error: std::error::Error + Send + Sync + 'static;

    async fn deploy(
        &self,
        job: Job,
        hosts: Vec<String>,
        wait_ports: HashSet<String>,
    ) -> Result<Self::Handle, Self::Error>;
}
