//! Shopping cart state container.
//!
//! The cart is the only stateful component in the storefront. It owns an
//! ordered set of lines (one per product), mutates them through a small
//! set of total operations, and mirrors every mutation to a
//! [`CartStorage`] adapter so the cart survives across visits.
//!
//! The store itself performs no validation of product availability:
//! whether an out-of-stock product may be added is a decision for the
//! UI layer, which renders the add-to-cart gate.

pub mod storage;
pub mod store;

pub use storage::{CartStorage, InMemoryStorage, JsonFileStorage, StorageError};
pub use store::{CartLine, CartState, CartStore};
