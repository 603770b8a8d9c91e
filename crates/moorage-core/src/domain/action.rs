//! Closed action sets for containers and compose projects.
//!
//! Route parameters are parsed into these enums at the HTTP edge, so an
//! unknown action never reaches a registry or subprocess call.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ports::CoreError;

/// Lifecycle action on a single container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerAction {
    Start,
    Stop,
    Restart,
}

impl ContainerAction {
    pub const ALL: [Self; 3] = [Self::Start, Self::Stop, Self::Restart];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
        }
    }
}

impl fmt::Display for ContainerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContainerAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("unknown action: {s}")))
    }
}

/// Compose action on a whole project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectAction {
    /// Pull images, then force-recreate containers.
    Pull,
    Up,
    Down,
    Restart,
}

impl ProjectAction {
    pub const ALL: [Self; 4] = [Self::Pull, Self::Up, Self::Down, Self::Restart];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pull => "pull",
            Self::Up => "up",
            Self::Down => "down",
            Self::Restart => "restart",
        }
    }

    /// Name reported back to clients once the action succeeded.
    pub const fn report_name(self) -> &'static str {
        match self {
            Self::Pull => "pull-recreate",
            other => other.as_str(),
        }
    }

    /// Compose sub-commands to run, in order. Each entry is one step.
    pub fn steps(self) -> Vec<ComposeStep> {
        match self {
            Self::Pull => vec![
                ComposeStep::new("pull", &["pull"]),
                ComposeStep::new("recreate", &["up", "-d", "--force-recreate"]),
            ],
            Self::Up => vec![ComposeStep::new("up", &["up", "-d"])],
            Self::Down => vec![ComposeStep::new("down", &["down"])],
            Self::Restart => vec![ComposeStep::new("restart", &["restart"])],
        }
    }
}

impl fmt::Display for ProjectAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectAction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| CoreError::Validation("unknown action".to_string()))
    }
}

/// One compose invocation within a project action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeStep {
    /// Label used in error messages (`pull failed: ...`).
    pub label: &'static str,
    /// Arguments after `compose -f docker-compose.yml`.
    pub args: Vec<&'static str>,
}

impl ComposeStep {
    fn new(label: &'static str, args: &[&'static str]) -> Self {
        Self {
            label,
            args: args.to_vec(),
        }
    }
}

/// Successful outcome of a project action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionReport {
    pub action: &'static str,
    pub project: String,
    pub output: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn container_actions_parse() {
        assert_eq!("start".parse::<ContainerAction>().unwrap(), ContainerAction::Start);
        assert_eq!("restart".parse::<ContainerAction>().unwrap(), ContainerAction::Restart);
        assert!(matches!(
            "kill".parse::<ContainerAction>(),
            Err(CoreError::Validation(_))
        ));
        assert!("Start".parse::<ContainerAction>().is_err());
    }

    #[test]
    fn project_actions_parse() {
        for action in ProjectAction::ALL {
            assert_eq!(action.as_str().parse::<ProjectAction>().unwrap(), action);
        }
        assert!("build".parse::<ProjectAction>().is_err());
    }

    #[test]
    fn pull_is_two_steps() {
        let steps = ProjectAction::Pull.steps();
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].args, ["pull"]);
        assert_eq!(steps[1].args, ["up", "-d", "--force-recreate"]);
        assert_eq!(ProjectAction::Pull.report_name(), "pull-recreate");
    }

    #[test]
    fn single_step_actions() {
        assert_eq!(ProjectAction::Up.steps()[0].args, ["up", "-d"]);
        assert_eq!(ProjectAction::Down.steps()[0].args, ["down"]);
        assert_eq!(ProjectAction::Restart.steps()[0].args, ["restart"]);
        assert_eq!(ProjectAction::Up.report_name(), "up");
    }

    #[test]
    fn serde_uses_lowercase_tags() {
        let json = serde_json::to_string(&ContainerAction::Stop).unwrap();
        assert_eq!(json, "\"stop\"");
        let parsed: ProjectAction = serde_json::from_str("\"down\"").unwrap();
        assert_eq!(parsed, ProjectAction::Down);
    }
}
