//! stratus-core
//!
//! Pure domain types, the managed field set, and log naming conventions.
//! No AWS SDK dependency. This is the shared vocabulary of the stratus
//! workspace. The `Provider` capability trait lives here too so the engine
//! and the AWS implementation agree on one interface.

pub mod arn;
pub mod error;
pub mod log_names;
pub mod managed;
pub mod models;
pub mod provider;

pub use crate::arn::{ResourceArn, ResourceKind};
pub use crate::error::{CoreError, ProviderError};
pub use crate::managed::ManagedFieldSet;
pub use crate::provider::{BoxFuture, Provider};
