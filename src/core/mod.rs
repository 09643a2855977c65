pub mod audit;
pub mod backup;
pub mod bus;
pub mod cache;
pub mod leave;
pub mod log;
pub mod notify;
pub mod resolver;
pub mod station;
pub mod student;
pub mod summary;
