//! Route handlers for the sign-in and profile surfaces.

pub mod health;
pub mod profile;
pub mod root;
pub mod sign_in;
