//! Pluggable implementations for different architectures.
//!
//! Only the serial 32-bit backend is provided; the module split keeps the
//! door open for wider-limb or vectorized implementations without touching
//! the public types.

pub mod serial;
