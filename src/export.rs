//! Export renderers over an endpoint document.
//!
//! All of these are pure string/JSON builders; writing to a file or stdout
//! is the CLI's job.
pub mod code;
pub mod markdown;
pub mod notes;
pub mod openapi;
