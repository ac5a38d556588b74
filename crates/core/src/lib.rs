//! Core business logic for Fundflow.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Request records, validation rules, workflow transitions and rollups live here;
//! persistence happens behind the store ports in `fundflow-db`.
//!
//! # Modules
//!
//! - `request` - Deposit and withdrawal records and their enumerations
//! - `account` - Account balance snapshot
//! - `validation` - Pre-creation rule checks
//! - `workflow` - Approval state machines
//! - `reference` - Reference number generation
//! - `stats` - Dashboard rollups
//! - `error` - Error taxonomy shared by all operations
//! - `outcome` - Structured operation result

pub mod account;
pub mod error;
pub mod outcome;
pub mod reference;
pub mod request;
pub mod stats;
pub mod validation;
pub mod workflow;

pub use error::{ErrorKind, RequestError, RequestResult};
pub use outcome::OperationResult;
