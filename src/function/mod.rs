//! Edge functions: the `fetch` contract hosted by the runtime.

pub mod handler;

pub use handler::{EdgeError, EdgeFunction, FunctionContext};
