//! Domain types shared by services and adapters.

mod action;
mod container;
mod project;

pub use action::{ActionReport, ComposeStep, ContainerAction, ProjectAction};
pub use container::{
    Container, ContainerCounts, compare_for_display, sort_containers, tally_by_project,
};
pub use project::{HIDDEN_PREFIX, ProjectFile, ProjectFileKind, ProjectName, ProjectRecord};

#[cfg(test)]
pub(crate) use container::fixtures;
