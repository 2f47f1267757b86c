//! Reconciliation engine for L7-protected endpoints.
//!
//! Takes an operator-declared configuration and the state observed after
//! the previous pass, and issues the minimal, correctly ordered set of
//! remote calls to make the remote service match the declaration:
//!
//! - the top-level resource's scalar fields are diffed per field, so an
//!   update call is only issued when something actually differs;
//! - the nested origin set is matched by IP address, because an origin's
//!   surrogate id does not exist before the server creates it;
//! - the custom SSL key/certificate are carried forward from the declared
//!   configuration on every pass, since no server response ever returns
//!   them.
//!
//! There is no retry, locking or rollback here. A failed pass leaves the
//! remote side wherever the last successful call put it; re-running with
//! the same declaration completes the remaining work.

pub mod converge;
pub mod diff;
pub mod error;
pub mod model;
pub mod origins;
pub mod remote;

pub use converge::Converger;
pub use error::ConvergeError;
pub use model::{OriginSpec, ResourceSpec, ResourceState};
pub use remote::RemoteApi;
