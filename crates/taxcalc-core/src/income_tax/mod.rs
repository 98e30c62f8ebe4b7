pub mod engine;
pub mod slabs;
