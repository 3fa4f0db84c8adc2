//! Integration tests for Ada's Kitchen.
//!
//! # Running Tests
//!
//! ```bash
//! # Create the session tables and start both binaries first, then:
//! cargo test -p adas-kitchen-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `storefront_cart` - Cart flows over HTTP (session-cookie backed)
//! - `admin_access` - Staff-gate behavior on the dashboards
//!
//! The tests talk to whatever servers `STOREFRONT_BASE_URL` and
//! `ADMIN_BASE_URL` point at; they create real documents when they run
//! against a live document store, so point them at a scratch project.
