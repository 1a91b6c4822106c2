//! Serial implementations of field, scalar, point and scalar-mul arithmetic.

pub mod curve_models;
pub mod scalar_mul;
pub mod u32;
