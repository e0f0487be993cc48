//! Folder management and tree services.

pub mod assembler;
pub mod service;
pub mod tree;

pub use assembler::TreeAssembler;
pub use service::FolderService;
pub use tree::TreeService;
