// ABOUTME: Builder that accumulates a temporary job and deploys it once.
// ABOUTME: Resolves default name/version and target hosts at deploy time.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use crate::config::{self, EnvSource, HOST_FILTER_VAR, ProcessEnv};
use crate::error::{Error, Result};
use crate::image_info;
use crate::types::{Job, JobDraft, PortMapping, ServiceEndpoint, ServicePorts};

use super::deployer::Deployer;
use super::naming;

/// Declarative builder for a job that a test deploys and later tears down.
///
/// Configuration calls may come in any order and are not validated. The
/// first successful [`deploy`](Self::deploy) freezes the job; every later
/// call returns the same handle without contacting the deployer.
///
/// ```ignore
/// let mut job = JobSpecBuilder::new(deployer);
/// job.image("nginx:1.25").port("http", 80).env("MODE", "test");
/// let handle = job.deploy().await?;
/// ```
pub struct JobSpecBuilder<D: Deployer> {
    deployer: Arc<D>,
    env: Arc<dyn EnvSource>,
    hosts: Vec<String>,
    draft: JobDraft,
    wait_ports: HashSet<String>,
    deployed: Option<D::Handle>,
}

impl<D: Deployer> fmt::Debug for JobSpecBuilder<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobSpecBuilder")
            .field("hosts", &self.hosts)
            .field("draft", &self.draft)
            .field("wait_ports", &self.wait_ports)
            .field("deployed", &self.deployed.is_some())
            .finish()
    }
}

impl<D: Deployer> JobSpecBuilder<D> {
    /// Create a builder that reads the real process environment.
    pub fn new(deployer: Arc<D>) -> Self {
        Self {
            deployer,
            env: Arc::new(ProcessEnv),
            hosts: Vec::new(),
            draft: JobDraft::default(),
            wait_ports: HashSet::new(),
            deployed: None,
        }
    }

    /// Replace the environment used for host filter and image info lookups.
    pub fn env_source(&mut self, env: Arc<dyn EnvSource>) -> &mut Self {
        self.env = env;
        self
    }

    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.draft.name = Some(name.into());
        self
    }

    pub fn version(&mut self, version: impl Into<String>) -> &mut Self {
        self.draft.version = Some(version.into());
        self
    }

    pub fn image(&mut self, image: impl Into<String>) -> &mut Self {
        self.draft.image = Some(image.into());
        self
    }

    pub fn command<I, S>(&mut self, command: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.draft.command = command.into_iter().map(Into::into).collect();
        self
    }

    pub fn env(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.draft.env.insert(key.into(), value.to_string());
        self
    }

    /// Map a port with a dynamic external port and wait for it on deploy.
    pub fn port(&mut self, name: impl Into<String>, internal_port: u16) -> &mut Self {
        self.port_mapping(name, PortMapping::dynamic(internal_port), true)
    }

    pub fn port_with_wait(
        &mut self,
        name: impl Into<String>,
        internal_port: u16,
        wait: bool,
    ) -> &mut Self {
        self.port_mapping(name, PortMapping::dynamic(internal_port), wait)
    }

    /// Map a port to a requested external port and wait for it on deploy.
    pub fn external_port(
        &mut self,
        name: impl Into<String>,
        internal_port: u16,
        external_port: u16,
    ) -> &mut Self {
        self.port_mapping(
            name,
            PortMapping::new(internal_port, Some(external_port)),
            true,
        )
    }

    /// Register a port mapping; with `wait` the deployer must see the port
    /// ready before `deploy` returns.
    pub fn port_mapping(
        &mut self,
        name: impl Into<String>,
        mapping: PortMapping,
        wait: bool,
    ) -> &mut Self {
        let name = name.into();
        if wait {
            self.wait_ports.insert(name.clone());
        } else {
            self.wait_ports.remove(&name);
        }
        self.draft.ports.insert(name, mapping);
        self
    }

    pub fn registration(&mut self, endpoint: ServiceEndpoint, ports: ServicePorts) -> &mut Self {
        self.draft.registration.insert(endpoint, ports);
        self
    }

    /// Shorthand for registering `service` over `protocol` on the named ports.
    pub fn service_registration<I, S>(
        &mut self,
        service: impl Into<String>,
        protocol: impl Into<String>,
        ports: I,
    ) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.registration(
            ServiceEndpoint::new(service, protocol),
            ServicePorts::new(ports),
        )
    }

    /// Replace all registrations.
    pub fn registrations<I>(&mut self, registrations: I) -> &mut Self
    where
        I: IntoIterator<Item = (ServiceEndpoint, ServicePorts)>,
    {
        self.draft.registration = registrations.into_iter().collect::<HashMap<_, _>>();
        self
    }

    pub fn host(&mut self, host: impl Into<String>) -> &mut Self {
        self.hosts.push(host.into());
        self
    }

    pub fn hosts<I, S>(&mut self, hosts: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.hosts.extend(hosts.into_iter().map(Into::into));
        self
    }

    /// Port names the deployer will wait on.
    pub fn wait_ports(&self) -> &HashSet<String> {
        &self.wait_ports
    }

    /// Handle from the first successful deploy, if any.
    pub fn deployed(&self) -> Option<&D::Handle> {
        self.deployed.as_ref()
    }

    pub fn is_deployed(&self) -> bool {
        self.deployed.is_some()
    }

    /// Deploy to the configured hosts, falling back to `HELIOS_HOST_FILTER`
    /// when none were configured.
    pub async fn deploy(&mut self) -> std::result::Result<&D::Handle, D::Error> {
        self.deploy_to(std::iter::empty::<String>()).await
    }

    /// Deploy to the configured hosts plus `hosts`.
    ///
    /// Only the first successful call deploys. Later calls return the cached
    /// handle and ignore `hosts`. A failed deploy caches nothing and its error
    /// is returned as the deployer produced it.
    pub async fn deploy_to<I, S>(
        &mut self,
        hosts: I,
    ) -> std::result::Result<&D::Handle, D::Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.deployed {
            Some(ref handle) => {
                tracing::debug!("Job already deployed, returning existing handle");
                Ok(handle)
            }
            None => {
                self.hosts.extend(hosts.into_iter().map(Into::into));
                let (job, hosts) = self.resolve();

                tracing::info!(
                    "Deploying job {} ({}) to {} host(s), waiting on {} port(s)",
                    job.id().as_deref().unwrap_or("<unnamed>"),
                    job.image().unwrap_or("<no image>"),
                    hosts.len(),
                    self.wait_ports.len()
                );

                let handle = self
                    .deployer
                    .deploy(job, hosts, self.wait_ports.clone())
                    .await?;
                Ok(self.deployed.insert(handle))
            }
        }
    }

    /// Fill in defaults and snapshot the job and target hosts.
    fn resolve(&mut self) -> (Job, Vec<String>) {
        if self.draft.name.is_none() && self.draft.version.is_none() {
            let name = naming::job_name(self.draft.image.as_deref().unwrap_or_default());
            let version = naming::random_version();
            tracing::debug!("Defaulted job name {} and version {}", name, version);
            self.draft.name = Some(name);
            self.draft.version = Some(version);
        }

        if self.hosts.is_empty()
            && let Some(host) = config::host_filter(self.env.as_ref())
        {
            tracing::debug!("No hosts configured, using {} from {}", host, HOST_FILTER_VAR);
            self.hosts = vec![host];
        }

        (self.draft.build(), self.hosts.clone())
    }

    /// Set the image from the current build's image info.
    ///
    /// `IMAGE_INFO_PATH` names the file directly; otherwise the resource
    /// named by `IMAGE_INFO_NAME` (default `image_info.json`) is used.
    ///
    /// # Panics
    ///
    /// Panics if the info cannot be read or has no string `image` field.
    pub fn image_from_build(&mut self) -> &mut Self {
        let loaded = image_info::from_build(self.env.as_ref());
        self.apply_or_abort(loaded)
    }

    pub fn try_image_from_build(&mut self) -> Result<&mut Self> {
        let image = image_info::from_build(self.env.as_ref())?;
        Ok(self.apply_image(image))
    }

    /// # Panics
    ///
    /// Panics if the file cannot be read or has no string `image` field.
    pub fn image_from_info_file(&mut self, path: impl AsRef<Path>) -> &mut Self {
        let loaded = image_info::from_file(path.as_ref());
        self.apply_or_abort(loaded)
    }

    pub fn try_image_from_info_file(&mut self, path: impl AsRef<Path>) -> Result<&mut Self> {
        let image = image_info::from_file(path.as_ref())?;
        Ok(self.apply_image(image))
    }

    /// Read image info from an open file or any other reader.
    ///
    /// # Panics
    ///
    /// Panics if reading fails or there is no string `image` field.
    pub fn image_from_info_reader(&mut self, reader: impl Read, location: &str) -> &mut Self {
        let loaded = image_info::from_reader(reader, location);
        self.apply_or_abort(loaded)
    }

    pub fn try_image_from_info_reader(
        &mut self,
        reader: impl Read,
        location: &str,
    ) -> Result<&mut Self> {
        let image = image_info::from_reader(reader, location)?;
        Ok(self.apply_image(image))
    }

    /// # Panics
    ///
    /// Panics on malformed JSON or a missing or non-string `image` field.
    pub fn image_from_info_json(&mut self, json: &str, location: &str) -> &mut Self {
        let loaded = image_info::parse(json, location);
        self.apply_or_abort(loaded)
    }

    pub fn try_image_from_info_json(&mut self, json: &str, location: &str) -> Result<&mut Self> {
        let image = image_info::parse(json, location)?;
        Ok(self.apply_image(image))
    }

    fn apply_image(&mut self, image: String) -> &mut Self {
        tracing::debug!("Using image {} from image info", image);
        self.image(image)
    }

    fn apply_or_abort(&mut self, loaded: Result<String>) -> &mut Self {
        match loaded {
            Ok(image) => self.apply_image(image),
            Err(e) => abort(e),
        }
    }
}

/// Image info failures end the calling test.
fn abort(err: Error) -> ! {
    panic!("{err}")
}
