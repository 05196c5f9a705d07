// ABOUTME: Environment-driven configuration for temporary jobs.
// ABOUTME: Host filter fallback, image info source selection, and resource lookup.

mod env_source;

pub use env_source::{EnvSource, ProcessEnv};

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Host used when a job is deployed without any explicit hosts.
pub const HOST_FILTER_VAR: &str = "HELIOS_HOST_FILTER";

/// Filesystem path of the image info JSON file.
pub const IMAGE_INFO_PATH_VAR: &str = "IMAGE_INFO_PATH";

/// Resource name of the image info JSON file, used when no path is set.
pub const IMAGE_INFO_NAME_VAR: &str = "IMAGE_INFO_NAME";

pub const DEFAULT_IMAGE_INFO_NAME: &str = "image_info.json";

/// Set by cargo for test binaries; anchors resource lookup to the crate root.
const MANIFEST_DIR_VAR: &str = "CARGO_MANIFEST_DIR";

/// Directory below each resource root that is searched second.
const BUILD_OUTPUT_DIR: &str = "target";

/// Host from the environment host filter, if set to a non-empty value.
pub fn host_filter(env: &dyn EnvSource) -> Option<String> {
    env.non_empty_var(HOST_FILTER_VAR)
}

/// Where the image info for the current build lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInfoSource {
    /// Explicit file path.
    Path(PathBuf),
    /// Resource name, resolved with [`locate_resource`].
    Resource(String),
}

impl ImageInfoSource {
    /// Select the source from the environment.
    ///
    /// Priority:
    /// 1. `IMAGE_INFO_PATH`
    /// 2. `IMAGE_INFO_NAME`
    /// 3. `image_info.json`
    pub fn from_env(env: &dyn EnvSource) -> Self {
        if let Some(path) = env.var(IMAGE_INFO_PATH_VAR) {
            return ImageInfoSource::Path(PathBuf::from(path));
        }

        let name = env
            .var(IMAGE_INFO_NAME_VAR)
            .unwrap_or_else(|| DEFAULT_IMAGE_INFO_NAME.to_string());
        ImageInfoSource::Resource(name)
    }
}

/// Directories a resource name is resolved against, in order.
fn resource_roots(env: &dyn EnvSource) -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if let Some(dir) = env.non_empty_var(MANIFEST_DIR_VAR) {
        roots.push(PathBuf::from(dir));
    }
    if let Ok(cwd) = std::env::current_dir()
        && !roots.contains(&cwd)
    {
        roots.push(cwd);
    }
    roots
}

/// Find a resource file by name.
///
/// Each root is tried as `<root>/<name>` and then `<root>/target/<name>`.
pub fn locate_resource(name: &str, env: &dyn EnvSource) -> Result<PathBuf> {
    locate_in(name, &resource_roots(env))
}

fn locate_in(name: &str, roots: &[PathBuf]) -> Result<PathBuf> {
    roots
        .iter()
        .flat_map(|root| candidates(root, name))
        .find(|path| path.is_file())
        .ok_or_else(|| Error::ResourceNotFound(name.to_string()))
}

fn candidates(root: &Path, name: &str) -> [PathBuf; 2] {
    [root.join(name), root.join(BUILD_OUTPUT_DIR).join(name)]
}
