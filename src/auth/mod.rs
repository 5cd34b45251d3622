//! Authentication and authorization.
//!
//! Session-based authentication with JWT cookies plus role-derived
//! permissions:
//!
//! - [`password`]: Argon2 password hashing and verification
//! - [`session`]: JWT session token creation, verification and cookies
//! - [`current_user`]: extractor for the authenticated user
//! - [`permissions`]: role-based permission checks and the
//!   [`permissions::RequiresPermission`] extractor
//!
//! Users log in via `/api/v1/authentication/login` with email and
//! password; the signed session token travels in a secure, HTTP-only
//! cookie and is verified on every request without a database
//! round-trip. Authorization distinguishes All-scoped operations
//! (doctors) from Own-scoped ones (mothers); ownership itself is
//! checked in handlers against the children table.

pub mod current_user;
pub mod password;
pub mod permissions;
pub mod session;
