//! Shared handle types
//!
//! Game entities are created by simulation threads and read (and occasionally
//! annotated) by the render thread, so they travel as reference-counted,
//! lock-protected handles.

use parking_lot::RwLock;
use std::sync::Arc;

/// Reference-counted, read/write-locked handle to an entity
pub type Shared<T> = Arc<RwLock<T>>;

/// Wrap a value in a [`Shared`] handle
pub fn shared<T>(value: T) -> Shared<T> {
    Arc::new(RwLock::new(value))
}

/// Check whether two handles point at the same entity
pub fn same_entity<T>(a: &Shared<T>, b: &Shared<T>) -> bool {
    Arc::ptr_eq(a, b)
}
