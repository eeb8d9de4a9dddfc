//! Gridline Core - Shared types library.
//!
//! This crate provides the domain types used across the Gridline
//! storefront: products, categories, and the newtype wrappers that keep
//! entity references type-safe.
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no
//! HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, and the product/category records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
