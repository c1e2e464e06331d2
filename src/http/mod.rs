//! Fetch-like HTTP values exchanged between the runtime and edge functions.

mod request;
mod response;

pub use request::{EdgeRequest, Method};
pub use response::{EdgeResponse, StatusCode};
