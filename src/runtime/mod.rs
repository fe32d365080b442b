pub mod graph;
pub mod ids;
pub mod package;
pub mod engine;
pub mod storage;
pub mod redis_storage;
