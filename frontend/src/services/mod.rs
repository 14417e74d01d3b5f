pub mod api;
pub mod download;
pub mod export;
pub mod format;
pub mod logging;
