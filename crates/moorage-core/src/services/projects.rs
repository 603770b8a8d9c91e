//! Project service - compose project discovery, file reads and actions.
//!
//! A project is an immediate, non-hidden subdirectory of the project root
//! that contains a `docker-compose.yml`. Nothing is cached: every call
//! re-reads the filesystem and, for discovery, re-lists containers once.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, COMPOSE_FILE_NAME, ENV_FILE_NAME, Timeouts};
use crate::domain::{
    ActionReport, ComposeStep, ContainerCounts, ProjectAction, ProjectFile, ProjectFileKind,
    ProjectName, ProjectRecord, tally_by_project,
};
use crate::ports::{CommandRunner, CommandSpec, ContainerRegistry, CoreError};

/// Separator placed between step outputs of a multi-step action.
const STEP_OUTPUT_SEPARATOR: &str = "\n---\n";

/// Service for compose projects under a single root directory.
pub struct ProjectService {
    root: PathBuf,
    compose_program: String,
    registry: Arc<dyn ContainerRegistry>,
    runner: Arc<dyn CommandRunner>,
    timeouts: Timeouts,
}

impl ProjectService {
    /// Create a project service from the application config.
    pub fn new(
        config: &AppConfig,
        registry: Arc<dyn ContainerRegistry>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            root: config.project_root.clone(),
            compose_program: config.compose_program.clone(),
            registry,
            runner,
            timeouts: config.timeouts,
        }
    }

    /// Directory scanned for projects.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Enumerate projects, sorted by name, with container counts.
    pub async fn discover(&self) -> Result<Vec<ProjectRecord>, CoreError> {
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| CoreError::io("read production root", e))?;

        let counts = self.counts_by_project().await;
        let mut records = Vec::new();

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CoreError::io("read production root", e))?
        {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if ProjectName::is_hidden(&name) {
                continue;
            }
            match entry.file_type().await {
                Ok(kind) if kind.is_dir() => {}
                _ => continue,
            }

            let dir = entry.path();
            if !exists(&dir.join(COMPOSE_FILE_NAME)).await {
                continue;
            }
            let has_env = exists(&dir.join(ENV_FILE_NAME)).await;

            records.push(ProjectRecord {
                counts: counts.get(&name).copied().unwrap_or_default(),
                name,
                path: dir,
                has_env,
            });
        }

        records.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(count = records.len(), root = %self.root.display(), "discovered projects");
        Ok(records)
    }

    /// Read the compose descriptor or env file of one project.
    pub async fn read_file(
        &self,
        raw_name: &str,
        kind: ProjectFileKind,
    ) -> Result<ProjectFile, CoreError> {
        let not_found = || CoreError::NotFound("not found".to_string());
        let name = ProjectName::parse(raw_name).map_err(|_| not_found())?;
        let path = name.dir_in(&self.root).join(kind.file_name());
        let read_error = |e: io::Error| CoreError::NotFound(format!("read {}: {e}", kind.label()));

        let dir = self.contained_dir(&name).await.map_err(read_error)?;
        let Some(dir) = dir else {
            return Err(not_found());
        };

        let bytes = tokio::fs::read(dir.join(kind.file_name()))
            .await
            .map_err(read_error)?;

        Ok(ProjectFile {
            name: name.to_string(),
            path,
            text: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    /// Run a compose action inside one project directory.
    ///
    /// Steps run in order; the first failing step ends the action, so a
    /// failed `pull` never recreates containers.
    pub async fn run_action(
        &self,
        raw_name: &str,
        action: ProjectAction,
    ) -> Result<ActionReport, CoreError> {
        let name = ProjectName::parse(raw_name)?;
        let descriptor = name.dir_in(&self.root).join(COMPOSE_FILE_NAME);
        let compose_missing =
            || CoreError::NotFound(format!("compose not found: {}", descriptor.display()));

        let dir = match self.contained_dir(&name).await {
            Ok(Some(dir)) => dir,
            Ok(None) => return Err(CoreError::Validation("invalid project".to_string())),
            Err(_) => return Err(compose_missing()),
        };
        if !exists(&dir.join(COMPOSE_FILE_NAME)).await {
            return Err(compose_missing());
        }

        let deadline = Instant::now() + self.timeouts.compose;
        let mut outputs: Vec<String> = Vec::new();

        for step in action.steps() {
            let spec = self.compose_command(&dir, &step);
            let remaining = deadline.saturating_duration_since(Instant::now());
            info!(project = %name, step = step.label, command = %spec, "running compose step");

            let output = self
                .runner
                .run(&spec, remaining)
                .await
                .map_err(|source| CoreError::Command {
                    operation: format!("{} failed", step.label),
                    source,
                })?;
            outputs.push(output.combined.clone());

            if !output.success {
                warn!(project = %name, step = step.label, status = %output.status_text(), "compose step failed");
                return Err(CoreError::ActionFailed {
                    message: format!(
                        "{} failed: {}\n{}",
                        step.label,
                        output.status_text(),
                        outputs.join(STEP_OUTPUT_SEPARATOR)
                    ),
                });
            }
        }

        info!(project = %name, action = %action, "compose action completed");
        Ok(ActionReport {
            action: action.report_name(),
            project: name.to_string(),
            output: outputs.join(STEP_OUTPUT_SEPARATOR),
        })
    }

    fn compose_command(&self, dir: &Path, step: &ComposeStep) -> CommandSpec {
        let args = ["compose", "-f", COMPOSE_FILE_NAME]
            .into_iter()
            .chain(step.args.iter().copied());
        CommandSpec::new(self.compose_program.clone(), args, dir)
    }

    /// Canonical project directory, or `None` when it resolves outside the root.
    async fn contained_dir(&self, name: &ProjectName) -> io::Result<Option<PathBuf>> {
        let root = tokio::fs::canonicalize(&self.root).await?;
        let dir = tokio::fs::canonicalize(name.dir_in(&self.root)).await?;
        if dir.starts_with(&root) && dir != root {
            Ok(Some(dir))
        } else {
            Ok(None)
        }
    }

    async fn counts_by_project(&self) -> HashMap<String, ContainerCounts> {
        let limit = self.timeouts.registry;
        match tokio::time::timeout(limit, self.registry.list(true)).await {
            Ok(Ok(containers)) => tally_by_project(&containers),
            Ok(Err(e)) => {
                warn!(error = %e, "container listing failed; project counts default to zero");
                HashMap::new()
            }
            Err(_) => {
                warn!(timeout = ?limit, "container listing timed out; project counts default to zero");
                HashMap::new()
            }
        }
    }
}

async fn exists(path: &Path) -> bool {
    tokio::fs::metadata(path).await.is_ok()
}
