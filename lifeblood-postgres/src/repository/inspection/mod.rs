pub mod repo_impl;
pub mod create;
pub mod find_by_id;
pub mod update;
pub mod list;
pub mod load_audits;
pub mod find_duplicate;
pub mod summarize;
#[cfg(test)]
pub mod test_utils;

pub use repo_impl::InspectionRepositoryImpl;
