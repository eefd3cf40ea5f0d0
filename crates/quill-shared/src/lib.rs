//! # Quill Shared
//!
//! Wire types shared by the server and any client of its JSON API.
//! Kept free of domain types so it can be compiled for a WASM front end.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
