//! # Shared Data Contracts
//!
//! Structural definitions of the payloads agents exchange. These are pure
//! serde models; validation and interpretation belong to the consumers.

pub mod models;
pub mod requests;
pub mod responses;

pub use models::*;
pub use requests::*;
pub use responses::*;
