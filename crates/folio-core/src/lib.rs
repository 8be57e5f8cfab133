pub mod config;
pub mod convert;
pub mod error;
pub mod extraction;
pub mod invoice;
pub mod layout;
pub mod model;
pub mod ocr;
pub mod progress;
mod tool;

pub use convert::outcome::{Conversion, ConversionOutput};
pub use convert::{convert, Backends, ConversionRequest, ConversionType};
pub use error::FolioError;
