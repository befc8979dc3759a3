//! Core types and trait definitions for the study content service.
//!
//! No HTTP and no database here: storage backends implement
//! [`store::ContentStore`], and everything above talks to that trait.

pub mod content;
pub mod error;
pub mod question;
pub mod store;
pub mod tree;

pub use error::{Error, Result};
