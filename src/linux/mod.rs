//! Distribution detection on Linux.
//!
//! Each submodule is one source of truth; [`resolve`] ties them together.

pub mod legacy;
pub mod lsb_release;
pub mod os_release;
pub mod resolve;

pub use resolve::resolve;
