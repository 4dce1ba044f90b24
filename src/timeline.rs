pub mod assemble;
pub mod store;
