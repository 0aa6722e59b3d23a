//! Reference and canonical resolution

pub mod canonical;
pub mod reference;

pub use canonical::CanonicalResolver;
pub use reference::{FocusReference, ReferenceResolver};
