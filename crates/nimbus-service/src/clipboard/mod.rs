//! Per-user clipboard for copy/cut-paste of files and folders.

pub mod service;

pub use service::ClipboardService;
