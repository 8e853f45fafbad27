//! # Folio Core
//!
//! The content-resolution and page-assembly pipeline.
//! This crate holds the domain model, the ports the content service and the
//! rendering host plug into, and the pure services that turn a raw document
//! into a page payload. It performs no I/O of its own.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::ContentError;
