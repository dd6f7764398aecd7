pub mod archive;
pub mod error;
pub mod install;
pub mod list;
pub mod output;
pub mod package;
pub mod runtime;
