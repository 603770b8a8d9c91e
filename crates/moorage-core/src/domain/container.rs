//! Container domain types.

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::config::COMPOSE_PROJECT_LABEL;

/// A container as reported by the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub id: String,
    /// Primary name without the leading `/` the daemon adds.
    pub name: String,
    pub image: String,
    /// Machine state (`running`, `exited`, `created`, ...).
    pub state: String,
    /// Human status line (`Up 3 hours`, `Exited (0) 2 days ago`).
    pub status: String,
    pub created: DateTime<Utc>,
    pub labels: HashMap<String, String>,
}

impl Container {
    /// Compose project label, if present and non-empty.
    pub fn compose_project(&self) -> Option<&str> {
        self.labels
            .get(COMPOSE_PROJECT_LABEL)
            .map(String::as_str)
            .filter(|p| !p.is_empty())
    }

    pub fn is_running(&self) -> bool {
        self.state == "running"
    }
}

/// Order for display: by compose project (missing sorts as empty), then name.
pub fn compare_for_display(a: &Container, b: &Container) -> Ordering {
    a.compose_project()
        .unwrap_or("")
        .cmp(b.compose_project().unwrap_or(""))
        .then_with(|| a.name.cmp(&b.name))
}

/// Sort containers in place for display.
pub fn sort_containers(containers: &mut [Container]) {
    containers.sort_by(compare_for_display);
}

/// Aggregated container counts for one compose project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContainerCounts {
    pub total: usize,
    pub running: usize,
    pub stopped: usize,
}

impl ContainerCounts {
    fn record(&mut self, container: &Container) {
        self.total += 1;
        if container.is_running() {
            self.running += 1;
        } else {
            self.stopped += 1;
        }
    }
}

/// Group containers by compose project label. Unlabelled containers are skipped.
pub fn tally_by_project(containers: &[Container]) -> HashMap<String, ContainerCounts> {
    let mut stats: HashMap<String, ContainerCounts> = HashMap::new();
    for container in containers {
        if let Some(project) = container.compose_project() {
            stats.entry(project.to_string()).or_default().record(container);
        }
    }
    stats
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Build a container with an optional compose project label.
    pub fn container(name: &str, state: &str, project: Option<&str>) -> Container {
        let mut labels = HashMap::new();
        if let Some(p) = project {
            labels.insert(COMPOSE_PROJECT_LABEL.to_string(), p.to_string());
        }
        Container {
            id: format!("{name}-id"),
            name: name.to_string(),
            image: "alpine:3".to_string(),
            state: state.to_string(),
            status: String::new(),
            created: DateTime::<Utc>::default(),
            labels,
        }
    }
}
