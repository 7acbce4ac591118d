//! Users module.
//!
//! Public registration and session-style login, plus profile management
//! for authenticated callers. New accounts always get the CLIENTE role;
//! ADMIN accounts come from the CLI.

pub mod controller;
pub mod router;
pub mod service;
