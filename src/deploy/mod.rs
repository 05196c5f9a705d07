// ABOUTME: Temporary job deployment: the builder and its deployer seam.
// ABOUTME: Exports JobSpecBuilder, the Deployer trait, and naming helpers.

mod builder;
mod deployer;
mod naming;

pub use builder::JobSpecBuilder;
pub use deployer::Deployer;
pub use naming::{JOB_NAME_PREFIX, job_name, random_version};
