//! Products module.
//!
//! Every read and write runs inside the subject's [`ProductScope`](vitrina_models::ProductScope):
//! ADMIN sees all products, STAFF the public ones and CLIENTE its own.
//! Create and update need STAFF or above, delete needs ADMIN.

pub mod controller;
pub mod router;
pub mod service;
