//! Logic modules: turn raw nested-installer declarations into validated
//! installer records.
//!
//! # Modules
//!
//! - `resolver`: two-scope precedence for the nested type and file list
//! - `coordinator`: resolve, attach, and validate one installer (or a whole manifest)

pub mod coordinator;
pub mod resolver;
