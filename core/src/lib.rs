//! Synchronous API client core for the PetFriends service.
//!
//! # Overview
//! Builds `HttpRequest` values and decodes `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, which keeps the core deterministic and testable.
//!
//! # Design
//! - `PetFriendsClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and a parse
//!   step (`decode` for the raw status/body pair, `parse_*` for typed data).
//! - No local validation: empty strings, any script, any `age` text are
//!   passed through untouched and the service decides.
//! - DTOs are defined independently from the fake service crate; the suite's
//!   integration tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod multipart;
pub mod types;

pub use client::PetFriendsClient;
pub use error::ApiError;
pub use http::{ApiResponse, HttpMethod, HttpRequest, HttpResponse, ResponseBody};
pub use multipart::MultipartForm;
pub use types::{AuthKey, Credentials, Pet, PetFields, PetFilter, PetList, Photo};
