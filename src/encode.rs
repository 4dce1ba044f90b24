pub mod gif;
pub mod sink;
