//! Functional suite harness for the PetFriends REST service.
//!
//! # Overview
//! `PetFriends` wraps each service operation as one blocking round trip
//! that returns the `(status, body)` pair without judging it; scenarios in
//! `tests/` assert on those pairs. The request shapes come from
//! `petfriends-core`, the I/O from a `Transport` (ureq by default).
//!
//! # Design
//! - Without `PF_BASE_URL`, each `Session` starts its own in-process fake,
//!   so scenarios do not share one account's pet list.
//! - Setup steps that need data (an own pet to update or delete) go
//!   through `fixtures::ensure_own_pet`; when that cannot be satisfied the
//!   scenario ends with `SuiteError::Precondition`, not an assertion panic.

pub mod api;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod logging;
pub mod session;
pub mod transport;

pub use api::PetFriends;
pub use config::{Config, ConfigError};
pub use error::SuiteError;
pub use fixtures::{ensure_own_pet, first_own_pet, read_photo, Fixtures};
pub use logging::init_logging;
pub use session::{spawn_fake, Session};
pub use transport::{Transport, UreqTransport};
