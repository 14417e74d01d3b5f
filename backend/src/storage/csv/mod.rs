pub mod category_repository;
pub mod connection;
pub mod payable_repository;
pub mod permission_repository;
pub mod provider_repository;

#[cfg(test)]
pub mod test_utils;

pub use category_repository::CategoryRepository;
pub use connection::CsvConnection;
pub use payable_repository::PayableRepository;
pub use permission_repository::PermissionRepository;
pub use provider_repository::ProviderRepository;
