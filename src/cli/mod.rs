//! CLI command implementations
//!
//! - `generate`: run the pipeline on a request and an interpretation
//! - `schema`: print JSON Schemas for the input and output documents
//! - `util`: shared argument and file helpers

pub mod generate;
pub mod schema;
pub mod util;

pub use generate::cmd_generate;
pub use schema::cmd_schema;
