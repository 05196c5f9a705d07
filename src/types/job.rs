// ABOUTME: Immutable job specification handed to a deployer.
// ABOUTME: JobDraft accumulates fields while a builder is being configured.

use super::port_mapping::PortMapping;
use super::registration::{ServiceEndpoint, ServicePorts};
use serde::Serialize;
use std::collections::HashMap;

/// A finished, immutable description of a deployable workload.
///
/// `name` and `version` are optional because a builder only defaults them
/// when both are unset; a half-specified job is passed through as-is and
/// left for the deployer to accept or reject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Job {
    name: Option<String>,
    version: Option<String>,
    image: Option<String>,
    command: Vec<String>,
    env: HashMap<String, String>,
    ports: HashMap<String, PortMapping>,
    registration: HashMap<ServiceEndpoint, ServicePorts>,
}

impl Job {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn command(&self) -> &[String] {
        &self.command
    }

    pub fn env(&self) -> &HashMap<String, String> {
        &self.env
    }

    pub fn ports(&self) -> &HashMap<String, PortMapping> {
        &self.ports
    }

    pub fn registration(&self) -> &HashMap<ServiceEndpoint, ServicePorts> {
        &self.registration
    }

    /// `name:version`, when both are known.
    pub fn id(&self) -> Option<String> {
        match (&self.name, &self.version) {
            (Some(name), Some(version)) => Some(format!("{name}:{version}")),
            _ => None,
        }
    }
}

/// Mutable job state owned by a builder until deploy time.
#[derive(Debug, Clone, Default)]
pub(crate) struct JobDraft {
    pub name: Option<String>,
    pub version: Option<String>,
    pub image: Option<String>,
    pub command: Vec<String>,
    pub env: HashMap<String, String>,
    pub ports: HashMap<String, PortMapping>,
    pub registration: HashMap<ServiceEndpoint, ServicePorts>,
}

impl JobDraft {
    pub fn build(&self) -> Job {
        Job {
            name: self.name.clone(),
            version: self.version.clone(),
            image: self.image.clone(),
            command: self.command.clone(),
            env: self.env.clone(),
            ports: self.ports.clone(),
            registration: self.registration.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_copies_every_field() {
        let mut draft = JobDraft {
            name: Some("web".to_string()),
            version: Some("1".to_string()),
            image: Some("nginx:1.25".to_string()),
            command: vec!["nginx".to_string(), "-g".to_string()],
            ..Default::default()
        };
        draft.env.insert("MODE".to_string(), "test".to_string());
        draft
            .ports
            .insert("http".to_string(), PortMapping::dynamic(80));
        draft.registration.insert(
            ServiceEndpoint::new("web", "http"),
            ServicePorts::new(["http"]),
        );

        let job = draft.build();
        assert_eq!(job.name(), Some("web"));
        assert_eq!(job.version(), Some("1"));
        assert_eq!(job.image(), Some("nginx:1.25"));
        assert_eq!(job.command(), ["nginx", "-g"]);
        assert_eq!(job.env().get("MODE").map(String::as_str), Some("test"));
        assert_eq!(job.ports()["http"].internal_port(), 80);
        assert_eq!(job.registration().len(), 1);
        assert_eq!(job.id().as_deref(), Some("web:1"));
    }

    #[test]
    fn built_job_is_detached_from_draft() {
        let mut draft = JobDraft {
            image: Some("a".to_string()),
            ..Default::default()
        };
        let job = draft.build();
        draft.image = Some("b".to_string());
        assert_eq!(job.image(), Some("a"));
    }

    #[test]
    fn id_requires_name_and_version() {
        let draft = JobDraft {
            name: Some("web".to_string()),
            ..Default::default()
        };
        assert!(draft.build().id().is_none());
    }

    #[test]
    fn job_serializes_registration_keys_as_strings() {
        let mut draft = JobDraft::default();
        draft.registration.insert(
            ServiceEndpoint::new("web", "http"),
            ServicePorts::new(["http"]),
        );
        let value = serde_json::to_value(draft.build()).unwrap();
        assert_eq!(value["registration"]["web/http"][0], "http");
    }
}
