// ABOUTME: Value types describing a deployable job.
// ABOUTME: Job, port mappings, and service registrations.

mod job;
mod port_mapping;
mod registration;

pub(crate) use job::JobDraft;
pub use job::Job;
pub use port_mapping::{PortMapping, Protocol};
pub use registration::{ServiceEndpoint, ServicePorts};
