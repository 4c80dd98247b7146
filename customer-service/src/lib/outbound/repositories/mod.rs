pub mod orm;
pub mod schema;
pub mod sql;

pub use orm::DieselCustomerRepository;
pub use sql::PostgresCustomerRepository;
