//! Infrastructure-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// Infrastructure errors wrap application errors on their way to the CLI.
///
/// Store and filesystem failures surface as `io::Error` from the boundary
/// traits and get their context in the application layer.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),
}
