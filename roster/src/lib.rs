//! Roster management for institutional users and students.
//!
//! The [`domain`] module holds the record model, schema validation,
//! duplicate detection and the paginated operations controller. Adapters in
//! [`outbound`] connect the domain ports to files and logs, and [`config`]
//! loads runtime settings.

pub mod config;
pub mod domain;
pub mod outbound;
