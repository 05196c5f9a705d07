// ABOUTME: Test support utilities.
// ABOUTME: Provides in-memory deployers and environment helpers for integration tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Once};
use tempjob::Deployer;
use tempjob::config::EnvSource;
use tempjob::types::Job;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter =
            EnvFilter::from_default_env().add_directive("tempjob=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Arguments of one `Deployer::deploy` call.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    pub job: Job,
    pub hosts: Vec<String>,
    pub wait_ports: HashSet<String>,
}

/// Handle returned by [`RecordingDeployer`].
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestHandle {
    pub id: usize,
    pub job_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
#[error("deploy failed: {0}")]
pub struct TestDeployError(pub String);

/// Records every deploy request. Fails the first `failures` calls.
#[derive(Default)]
pub struct RecordingDeployer {
    requests: Mutex<Vec<DeployRequest>>,
    failures: Mutex<usize>,
}

#[allow(dead_code)]
impl RecordingDeployer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing(failures: usize) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            failures: Mutex::new(failures),
        })
    }

    pub fn requests(&self) -> Vec<DeployRequest> {
        self.requests.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    /// The only request made; panics unless exactly one was recorded.
    pub fn single_request(&self) -> DeployRequest {
        let requests = self.requests.lock();
        assert_eq!(requests.len(), 1, "expected exactly one deploy call");
        requests[0].clone()
    }
}

#[async_trait]
impl Deployer for RecordingDeployer {
    type Handle = TestHandle;
    type Error = TestDeployError;

    async fn deploy(
        &self,
        job: Job,
        hosts: Vec<String>,
        wait_ports: HashSet<String>,
    ) -> Result<TestHandle, TestDeployError> {
        let job_id = job.id();
        let id = {
            let mut requests = self.requests.lock();
            requests.push(DeployRequest {
                job,
                hosts,
                wait_ports,
            });
            requests.len()
        };

        let mut failures = self.failures.lock();
        if *failures > 0 {
            *failures -= 1;
            return Err(TestDeployError(format!("attempt {id}")));
        }

        Ok(TestHandle { id, job_id })
    }
}

/// Fake environment built from key/value pairs.
#[allow(dead_code)]
pub fn fake_env(vars: &[(&str, &str)]) -> Arc<dyn EnvSource> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Arc::new(map)
}
