pub mod executor;
pub mod postgres_repositories;
pub mod repository;
pub mod utils;

pub use executor::Executor;
pub use postgres_repositories::PostgresRepositories;
pub use repository::inspection::InspectionRepositoryImpl;

#[cfg(test)]
pub mod test_helper;
