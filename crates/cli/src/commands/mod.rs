//! CLI Commands

pub mod extract;
pub mod probe;
pub mod reconcile;
pub mod run;
pub mod verify;
