pub mod config;
pub mod engine;
pub mod errors;
pub mod executor;
pub mod hashing;
pub mod judge;
pub mod model;
pub mod report;
pub mod state;
pub mod storage;
