// ABOUTME: Default job names and versions for unnamed temporary jobs.
// ABOUTME: Names derive from the image; versions are random hex.

use rand::Rng;

/// Prefix of every derived job name.
pub const JOB_NAME_PREFIX: &str = "tmp_";

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

/// Derive a job name from an image reference.
///
/// Case is preserved; every character outside `[0-9A-Za-z._-]` becomes `_`.
pub fn job_name(image: &str) -> String {
    let sanitized: String = image
        .chars()
        .map(|c| if is_allowed(c) { c } else { '_' })
        .collect();
    format!("{JOB_NAME_PREFIX}{sanitized}")
}

/// Random job version in lowercase hex.
///
/// Uses the thread-local generator so builders on parallel test threads
/// never contend. 32 random bits make collisions unlikely within a test
/// run, not impossible.
pub fn random_version() -> String {
    format!("{:x}", rand::thread_rng().r#gen::<u32>())
}
