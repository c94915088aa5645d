// Compatibility shims so the core builds both with std and as no_std + alloc.
// Modules import collection and string types from here instead of std/alloc.

#[cfg(target_os = "none")]
extern crate alloc;

#[cfg(not(target_os = "none"))]
pub use std::{
    boxed::Box,
    fmt,
    format,
    string::{String, ToString},
    vec::Vec,
};

#[cfg(not(target_os = "none"))]
#[allow(unused_imports)]
pub use std::vec;

#[cfg(target_os = "none")]
pub use self::alloc::{
    boxed::Box,
    format,
    string::{String, ToString},
    vec::Vec,
};

#[cfg(target_os = "none")]
#[allow(unused_imports)]
pub use self::alloc::vec;

#[cfg(target_os = "none")]
pub use core::fmt;
