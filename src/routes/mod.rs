/// Router Module Index
///
/// Routes are grouped by who may call them. Grouping is for readability only:
/// access is enforced by the request gate's route table, which wraps the
/// whole router, so a route's protection follows from its path.

/// Public pages and public API (carousel, contact form, health).
pub mod public;

/// Login, logout and session introspection.
pub mod session;

/// Back-office pages and the admin-only content API.
pub mod admin;
