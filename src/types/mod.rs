// PageKeeper shared type definitions
// Each submodule defines types used across the agent.

pub mod alarm;
pub mod bookmark;
pub mod errors;
pub mod notification;
pub mod page;
pub mod settings;
