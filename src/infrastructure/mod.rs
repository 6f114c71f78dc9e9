pub mod text_extractor;

pub use text_extractor::{extractor_for_path, DocxTextExtractor, PlainTextExtractor, TextExtractor};
