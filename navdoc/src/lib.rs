//! Expose navdoc's internal API for use in unit testing. While it *could* be
//! useful, we do not recommend using this API in production code. It is
//! primarily intended for testing purposes.
pub mod cli;
pub mod error;
pub mod lookup;
pub mod page;
pub mod render;
pub mod resolve;
