//! Container codec for the custom file viewer.
//!
//! A container is a single JSON document with two fields: `metadata`, a flat
//! map describing the wrapped file, and `content`, the file's raw bytes in
//! standard base64. The wrapper is lossless and provides no confidentiality.

mod codec;
pub mod constants;
mod pdf_info;
mod types;

pub use codec::{decode, decode_str, encode, extract_payload, original_type_of};
pub use pdf_info::{PdfInfo, read_pdf_info};
pub use types::*;
