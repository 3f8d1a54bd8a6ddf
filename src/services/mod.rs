pub mod alternatives;
pub mod catalog;
pub mod mutations;
pub mod nutrition;
pub mod recommendations;
pub mod seed;

pub use catalog::Catalog;
