//! Core services - the application's business logic layer.
//!
//! Services orchestrate between ports (trait interfaces) and domain logic.
//! They apply deadlines and error context but never know which concrete
//! daemon client or process runner sits behind a port.

mod containers;
mod projects;

#[cfg(test)]
pub(crate) mod testing;

pub use containers::{ContainerService, resolve_tail};
pub use projects::ProjectService;
