pub mod auditable;
pub mod identifiable;
pub mod inspection;

// Re-exports
pub use auditable::*;
pub use identifiable::*;
pub use inspection::*;
