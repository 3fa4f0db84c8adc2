//! Ada's Kitchen backend-service clients.
//!
//! The platform keeps no catalog state of its own: menus, orders, and the
//! rest live in a hosted document store, and customer/staff identity lives
//! on a hosted identity provider. This crate wraps both behind small typed
//! clients so the storefront and admin binaries never touch raw HTTP.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod docstore;
pub mod identity;

pub use docstore::{DocstoreClient, DocstoreConfig, DocstoreError};
pub use identity::{IdentityClient, IdentityConfig, IdentityError};
