//! stratus-aws
//!
//! AWS implementation of the `Provider` capability interface. Thin wrapper
//! around the Lambda, Step Functions, CloudWatch Logs and STS SDKs; every
//! SDK error is classified into a `ProviderError` before it leaves here.

pub mod client;
pub mod error;
mod lambda;
mod logs;
mod provider;
mod states;

pub use crate::client::AwsProvider;
