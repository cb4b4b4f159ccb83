//! Bounded concurrent point trees.
//!
//! A [`PointTree`] maps a fixed-length coordinate vector (one value per metric
//! dimension) to a single shared point, creating points lazily on first use.
//! Creation is bounded twice: each tree level caps the number of distinct
//! values it holds, and the [`PointOwner`] caps the total number of points.
//!
//! Growth uses optimistic reservations: counters are bumped before a child is
//! published and rolled back if publication loses a race or a limit trips, so
//! neither bound is ever exceeded and no lock spans the whole tree.

mod error;
mod level;
mod owner;
mod reservation;
mod resolution;
#[cfg(test)]
mod testing;
mod tree;

pub use error::{Result, TreeError};
pub use owner::PointOwner;
pub use resolution::{Resolution, Status};
pub use tree::PointTree;
