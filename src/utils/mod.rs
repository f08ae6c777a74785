pub mod error;
pub mod fs;
pub mod mime;

pub use error::{ConverterError, ConverterResult};
pub use fs::{file_name_or_unknown, with_webp_extension};
pub use mime::{MediaType, mime_for_name};
