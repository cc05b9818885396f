//! Repository structs providing queries per entity.

pub mod product_repo;

pub use product_repo::ProductRepo;
