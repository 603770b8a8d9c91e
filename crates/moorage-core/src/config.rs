//! Process-wide configuration.
//!
//! `AppConfig` is built once at startup (by the CLI composition root) and
//! handed to every component that needs it. Nothing in the workspace reads
//! configuration from ambient globals.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::ports::CoreError;

/// Default listen address. The API is meant to sit behind a local reverse proxy.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:9069";

/// Default directory scanned for compose projects.
pub const DEFAULT_PROJECT_ROOT: &str = "/home/l/Production";

/// Default compose CLI entry point (`docker compose ...`).
pub const DEFAULT_COMPOSE_PROGRAM: &str = "docker";

/// Descriptor file that marks a directory as a compose project.
pub const COMPOSE_FILE_NAME: &str = "docker-compose.yml";

/// Optional environment file next to the descriptor.
pub const ENV_FILE_NAME: &str = ".env";

/// Label the compose CLI stamps on every container it creates.
pub const COMPOSE_PROJECT_LABEL: &str = "com.docker.compose.project";

/// Tail size used when the client does not ask for one.
pub const DEFAULT_TAIL: &str = "200";

/// Deadlines applied to outbound work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Ceiling for every registry call, including log handle acquisition.
    pub registry: Duration,
    /// Grace period handed to the daemon for stop/restart before it kills.
    pub stop_grace: Duration,
    /// Ceiling for a whole compose action (both steps of `pull`).
    pub compose: Duration,
    /// How long in-flight requests may run after shutdown is requested.
    pub shutdown_grace: Duration,
    /// How long log acquisition waits for the first upstream chunk or error.
    pub log_settle: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            registry: Duration::from_secs(30),
            stop_grace: Duration::from_secs(10),
            compose: Duration::from_secs(5 * 60),
            shutdown_grace: Duration::from_secs(10),
            log_settle: Duration::from_millis(500),
        }
    }
}

/// Immutable application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub listen_addr: SocketAddr,
    /// Directory whose immediate children are compose projects.
    pub project_root: PathBuf,
    /// Program invoked for compose actions.
    pub compose_program: String,
    /// Operation deadlines.
    pub timeouts: Timeouts,
}

impl AppConfig {
    /// Create a config with the given project root and defaults elsewhere.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 9069)),
            project_root: project_root.into(),
            compose_program: DEFAULT_COMPOSE_PROGRAM.to_string(),
            timeouts: Timeouts::default(),
        }
    }

    /// Config with every default, including the project root.
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_PROJECT_ROOT)
    }

    /// Set the listen address.
    #[must_use]
    pub const fn with_listen_addr(mut self, addr: SocketAddr) -> Self {
        self.listen_addr = addr;
        self
    }

    /// Set the compose program.
    #[must_use]
    pub fn with_compose_program(mut self, program: impl Into<String>) -> Self {
        self.compose_program = program.into();
        self
    }

    /// Override the deadlines.
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Parse a listen address string.
    pub fn parse_listen_addr(raw: &str) -> Result<SocketAddr, CoreError> {
        raw.parse()
            .map_err(|e| CoreError::Validation(format!("invalid listen address {raw:?}: {e}")))
    }

    /// Check the config for values that can never work.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.project_root.is_absolute() {
            return Err(CoreError::Validation(format!(
                "project root must be an absolute path: {}",
                self.project_root.display()
            )));
        }
        if self.compose_program.trim().is_empty() {
            return Err(CoreError::Validation(
                "compose program must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_deployment() {
        let config = AppConfig::with_defaults();
        assert_eq!(config.listen_addr.to_string(), DEFAULT_LISTEN_ADDR);
        assert_eq!(config.project_root, PathBuf::from(DEFAULT_PROJECT_ROOT));
        assert_eq!(config.timeouts.registry, Duration::from_secs(30));
        assert_eq!(config.timeouts.stop_grace, Duration::from_secs(10));
        assert_eq!(config.timeouts.compose, Duration::from_secs(300));
        assert_eq!(config.timeouts.shutdown_grace, Duration::from_secs(10));
        assert_eq!(config.timeouts.log_settle, Duration::from_millis(500));
    }

    #[test]
    fn relative_project_root_is_rejected() {
        let config = AppConfig::new("relative/projects");
        assert!(matches!(config.validate(), Err(CoreError::Validation(_))));
    }

    #[test]
    fn empty_compose_program_is_rejected() {
        let config = AppConfig::new("/srv/projects").with_compose_program("  ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn listen_addr_parsing() {
        assert!(AppConfig::parse_listen_addr("127.0.0.1:8080").is_ok());
        assert!(AppConfig::parse_listen_addr("localhost").is_err());
    }
}
