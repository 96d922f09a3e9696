//! Tracing subscriber setup for hosts embedding the service

use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber filtered by `filter`
///
/// `RUST_LOG` takes precedence over `filter` when set. Returns an error if a
/// global subscriber is already installed or the directive does not parse.
pub fn init(filter: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(from_env) => from_env,
        Err(_) => EnvFilter::try_new(filter)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_an_error() {
        // Whichever test installs first wins; the next call must not panic
        let _ = init("info");
        assert!(init("info").is_err());
    }
}
