//! Address and URL resolution.
//!
//! - [`address`] - picking the address for a network role
//! - [`select`] - exactly-one candidate selection
//! - [`url`] - canonical URL construction

mod address;
mod select;
mod url;

// Re-export public functions
pub use address::{resolve_address, AddressResolver};
pub use select::{select_one, Selection};
pub use url::{canonical_url, canonical_url_for, format_url};
