//! Component storage and hidden-information resampling.
//!
//! ## Key Types
//!
//! - `ComponentRegistry`: ID-keyed store of every component, container
//!   membership and movement
//! - `redeterminize`: resamples containers hidden from an observer

pub mod redeterminize;
pub mod registry;

pub use redeterminize::redeterminize;
pub use registry::ComponentRegistry;
