//! Named checks and their dispatch registry

pub mod code_format;
pub mod registry;

pub use code_format::CodeFormatCheck;
pub use registry::{Check, CheckRegistry};
