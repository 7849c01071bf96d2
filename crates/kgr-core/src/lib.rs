#![deny(missing_docs)]
#![doc = "Error types shared by the sweep generator, launcher and companion tools."]

pub mod errors;

pub use errors::{ErrorInfo, KgrError};
