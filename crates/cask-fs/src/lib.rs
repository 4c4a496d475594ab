//! cask-fs: filesystem backend for the cask blob storage abstraction
//!
//! Maps blob identities to paths under a base directory and stores blob
//! content as plain files. Uniqueness under concurrent non-overriding
//! saves is enforced by the filesystem's atomic exclusive-create, not by
//! any in-process locking.

pub mod config;
pub mod path_calculator;
pub mod provider;

pub use config::FileSystemBlobConfig;
pub use path_calculator::{DefaultFilePathCalculator, FilePathCalculator};
pub use provider::FileSystemBlobProvider;
