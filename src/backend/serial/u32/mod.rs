//! The `u32` backend: limb arithmetic with `u32`s and 64-bit products.

pub mod constants;
pub mod field;
pub mod scalar;
