pub mod audit_diff;

pub use audit_diff::*;
