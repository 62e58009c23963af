//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Expired-entry purge: drops converted images past their TTL that no
//!   request has touched since (opt-in)

mod purge;

pub use purge::spawn_purge_task;
