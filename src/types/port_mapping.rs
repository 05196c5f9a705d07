// ABOUTME: Port mapping value type for job specifications.
// ABOUTME: Internal container port plus an optional requested external port.

use serde::Serialize;
use std::fmt;

/// Network protocol of a mapped port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "tcp"),
            Protocol::Udp => write!(f, "udp"),
        }
    }
}

/// A container port exposed by a job.
///
/// `external_port` of `None` lets the orchestrator pick the host port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PortMapping {
    internal_port: u16,
    external_port: Option<u16>,
    protocol: Protocol,
}

impl PortMapping {
    pub fn new(internal_port: u16, external_port: Option<u16>) -> Self {
        Self {
            internal_port,
            external_port,
            protocol: Protocol::Tcp,
        }
    }

    /// Shorthand for a mapping with a dynamically allocated external port.
    pub fn dynamic(internal_port: u16) -> Self {
        Self::new(internal_port, None)
    }

    pub fn with_protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    pub fn internal_port(&self) -> u16 {
        self.internal_port
    }

    pub fn external_port(&self) -> Option<u16> {
        self.external_port
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }
}

impl fmt::Display for PortMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.external_port {
            Some(external) => write!(f, "{}:{}/{}", external, self.internal_port, self.protocol),
            None => write!(f, "{}/{}", self.internal_port, self.protocol),
        }
    }
}
