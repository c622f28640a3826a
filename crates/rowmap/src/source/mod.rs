//! Cursor implementations shipped with the crate.
//!
//! Database cursors live with their drivers; this module only provides the
//! in-memory [`MemoryCursor`] used by tests and dataset files.

mod memory;

pub use memory::MemoryCursor;
