pub mod cii;
pub mod engine;
pub mod holding;
