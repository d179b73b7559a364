pub mod repositories;

mod database;
mod error_mapper;
mod repository_base;

pub use database::Database;
pub use error_mapper::RepositoryErrorMapper;
pub use repository_base::SqliteRepositoryBase;
