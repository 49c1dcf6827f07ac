//! Request middleware.
//!
//! Purpose: lifecycle concerns that apply to every request, currently
//! trace identifier assignment.

pub mod trace;

pub use trace::Trace;
