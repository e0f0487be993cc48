//! File upload, download, and metadata services.

pub mod service;

pub use service::FileService;
