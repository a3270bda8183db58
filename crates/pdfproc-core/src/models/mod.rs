//! Domain models

pub mod extraction;
pub mod object_ref;

pub use extraction::ExtractionResult;
pub use object_ref::ObjectReference;
