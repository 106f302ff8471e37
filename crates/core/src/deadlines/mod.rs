//! Legal deadline tracking

pub mod ports;
pub mod service;

pub use ports::DeadlineRepository;
pub use service::DeadlineService;
