pub mod error;
pub mod options;
