pub mod create;
pub mod find_by_id;
pub mod find_duplicate;
pub mod inspection_repository;
pub mod list_page;
pub mod load_audits;
pub mod pagination;
pub mod summarize;
pub mod update_audited;
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;

// Re-exports
pub use create::*;
pub use find_by_id::*;
pub use find_duplicate::*;
pub use inspection_repository::*;
pub use list_page::*;
pub use load_audits::*;
pub use pagination::*;
pub use summarize::*;
pub use update_audited::*;
#[cfg(any(test, feature = "test-utils"))]
pub use memory::*;
