//! # gw-types
//!
//! Core types shared by the gridwalk crates: the discretized parameter
//! space, the objective abstraction, and the error taxonomy.

pub mod errors;
pub mod objective;
pub mod space;

pub use errors::*;
pub use objective::*;
pub use space::*;
