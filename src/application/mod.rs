pub mod notifications;
pub mod ports;
pub mod storage;
