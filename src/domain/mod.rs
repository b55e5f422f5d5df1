//! Domain layer for the portal search overlay.
//!
//! Core types independent of any host, network stack, or rendering library.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`form`]: Snapshot of the host page's search form
//! - [`query`]: Pagination cursor, page size, scope, and submit guard
//! - [`response`]: Wire response model and shape normalization
//!
//! # Examples
//!
//! ```
//! use portalsearch::domain::{QueryState, Scope};
//!
//! let mut query = QueryState::new(10);
//! query.advance(10);
//! query.retreat(25);
//! assert_eq!(query.start_record, 0);
//! assert_eq!(Scope::from_flag(true), Scope::Global);
//! ```

pub mod error;
pub mod form;
pub mod query;
pub mod response;

pub use error::{PortalSearchError, Result};
pub use form::{FormField, HostForm};
pub use query::{QueryState, Scope};
pub use response::{Payload, SearchItem, SearchResponse};
