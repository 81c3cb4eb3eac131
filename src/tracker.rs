//! Interface to the hosted bug tracker.
//!
//! Workflows talk to a [`manager::TrackerManager`], which wraps any
//! [`traits::Tracker`] implementation and guards mutations behind dry-run.

/// Connection settings and credentials for the tracker.
pub mod config;

/// Launchpad REST web service client.
pub mod launchpad;

/// Logging and dry-run wrapper around a tracker implementation.
pub mod manager;

/// Request payloads for searches and mutations.
pub mod request;

/// Common trait for tracker abstraction.
pub mod traits;

/// Normalized tracker objects.
pub mod types;
