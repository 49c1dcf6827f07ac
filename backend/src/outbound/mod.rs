//! Outbound adapters implementing the domain repository ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel and `diesel-async`.
//! - **memory**: a single in-process store implementing every port, used
//!   when no database is configured and by the integration suite.
//!
//! Adapters translate between domain types and storage representations and
//! contain no business logic.

pub mod memory;
pub mod persistence;
