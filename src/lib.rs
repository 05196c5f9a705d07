// ABOUTME: Library root for tempjob - temporary jobs for integration tests.
// ABOUTME: Build a job spec, deploy it once through a Deployer, reuse the handle.

pub mod config;
pub mod deploy;
pub mod error;
pub mod image_info;
pub mod types;

pub use deploy::{Deployer, JobSpecBuilder};
