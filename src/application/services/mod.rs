//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem, DistributionStore)
//! but are themselves concrete structs, not traits.

mod distribution;
mod workspace;

pub use distribution::{validate_user, DistributionService};
pub use workspace::WorkspaceService;
