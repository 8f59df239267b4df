//! Activity entity.

pub mod model;

pub use model::{Activity, ActivityKind, NewActivity};
