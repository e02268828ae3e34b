//! Resource scope identifiers
//!
//! A scope identifier names the resource a custom metric is attributed to, in the form
//!
//! ```text
//! /subscriptions/<uuid>/resourceGroups/<group>/providers/<provider>/<type>/<name>[/<subtype>/<subname>]
//! ```
//!
//! Validation is purely syntactic and never reaches out to the network.

mod scope_id;

pub use scope_id::{ScopeFormatError, ScopeId};
