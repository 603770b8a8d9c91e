//! Command-line arguments.
//!
//! Every option can also come from the environment (or a `.env` file loaded
//! before parsing); flags win over the environment.

use std::path::PathBuf;

use clap::Parser;

use moorage_axum::ServerConfig;
use moorage_core::{AppConfig, DEFAULT_COMPOSE_PROGRAM, DEFAULT_LISTEN_ADDR, DEFAULT_PROJECT_ROOT};

use crate::error::CliError;

/// Local HTTP control plane for Docker containers and compose projects.
#[derive(Debug, Parser)]
#[command(name = "moorage")]
#[command(about = "Local HTTP control plane for Docker containers and compose projects")]
#[command(version)]
pub struct Cli {
    /// Address to bind the HTTP API to
    #[arg(long, env = "MOORAGE_LISTEN", default_value = DEFAULT_LISTEN_ADDR)]
    pub listen: String,

    /// Directory whose subdirectories are compose projects
    #[arg(long = "project-root", env = "MOORAGE_PROJECT_ROOT", default_value = DEFAULT_PROJECT_ROOT)]
    pub project_root: PathBuf,

    /// Program used for `<program> compose ...` invocations
    #[arg(long = "compose-bin", env = "MOORAGE_COMPOSE_BIN", default_value = DEFAULT_COMPOSE_PROGRAM)]
    pub compose_bin: String,

    /// Allowed CORS origin (repeatable; any origin when omitted)
    #[arg(long = "cors-origin", value_name = "ORIGIN")]
    pub cors_origins: Vec<String>,

    /// Emit logs as JSON lines
    #[arg(long = "log-json")]
    pub log_json: bool,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl Cli {
    /// Build and validate the server configuration.
    pub fn server_config(&self) -> Result<ServerConfig, CliError> {
        let listen = AppConfig::parse_listen_addr(&self.listen)?;
        let app = AppConfig::new(self.project_root.clone())
            .with_listen_addr(listen)
            .with_compose_program(&self.compose_bin);
        app.validate()?;
        Ok(ServerConfig::new(app).with_allowed_origins(self.cors_origins.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use moorage_axum::CorsConfig;

    #[test]
    fn test_cli_parser_builds() {
        Cli::command().debug_assert();
    }

    #[test]
    fn explicit_flags_build_config() {
        let cli = Cli::try_parse_from([
            "moorage",
            "--listen",
            "0.0.0.0:8088",
            "--project-root",
            "/srv/compose",
            "--compose-bin",
            "podman",
            "--cors-origin",
            "http://localhost:5173",
            "--cors-origin",
            "https://ops.example",
            "--log-json",
        ])
        .unwrap();
        assert!(cli.log_json);

        let config = cli.server_config().unwrap();
        assert_eq!(config.app.listen_addr.to_string(), "0.0.0.0:8088");
        assert_eq!(config.app.project_root, PathBuf::from("/srv/compose"));
        assert_eq!(config.app.compose_program, "podman");
        assert!(matches!(config.cors, CorsConfig::AllowOrigins(ref o) if o.len() == 2));
    }

    #[test]
    fn bad_listen_address_is_a_usage_error() {
        let cli = Cli::try_parse_from(["moorage", "--listen", "localhost"]).unwrap();
        let err = cli.server_config().unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("invalid listen address"));
    }

    #[test]
    fn relative_project_root_is_rejected() {
        let cli = Cli::try_parse_from(["moorage", "--project-root", "projects"]).unwrap();
        assert!(matches!(cli.server_config(), Err(CliError::Arguments(_))));
    }

    #[test]
    fn no_origins_allows_all() {
        let cli = Cli::try_parse_from(["moorage", "--project-root", "/srv/compose"]).unwrap();
        let config = cli.server_config().unwrap();
        assert!(matches!(config.cors, CorsConfig::AllowAll));
    }
}
