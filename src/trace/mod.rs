pub mod event;
pub mod logger;
