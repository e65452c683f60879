mod read_document;

pub use read_document::{decode_document, read_document, read_text, DocumentError};
