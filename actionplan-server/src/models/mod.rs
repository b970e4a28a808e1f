//! Domain models with validation at construction
//!
//! Path input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod id;
pub mod status;

pub use validation::ValidationError;
pub use id::RecordId;
pub use status::ActionStatus;
