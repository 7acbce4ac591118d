//! Token authentication.
//!
//! `POST /api/login/` exchanges credentials for an access/refresh pair and
//! writes an audit line for every attempt that passes the login throttle.
//! `POST /api/refresh/` mints a new access token and `GET /api/protected/`
//! echoes the authenticated subject.

pub mod controller;
pub mod router;
pub mod service;

/// Target of the `LOGIN OK` / `LOGIN FAIL` audit events.
pub const AUDIT_TARGET: &str = "vitrina::audit";
