pub mod core;
pub mod filter;
