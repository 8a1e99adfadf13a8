//! Runtime support for the code generated by the procedural macros.
//!
//! Not part of the public API; reachable only through `__private`.

mod join;

pub use join::MaybeDone;
