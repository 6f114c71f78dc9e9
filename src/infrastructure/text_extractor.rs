//! 文本提取 - 基础设施层
//!
//! 把二进制文档转换为纯文本。题目解析只依赖 `TextExtractor` 这个能力，
//! 不关心文档容器的具体格式。

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use std::path::Path;
use tracing::debug;

use crate::error::ExtractError;

/// docx 中正文所在的部件
const DOCUMENT_PART: &str = "word/document.xml";

/// 文本提取能力
pub trait TextExtractor: Send + Sync {
    /// 从文件字节中提取纯文本，段落之间用换行分隔
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractError>;
}

/// Word (.docx) 文本提取
///
/// 只读取正文段落的文字：每个 `w:p` 一行，`w:tab` 为制表符，`w:br` 为换行。
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxTextExtractor;

impl TextExtractor for DocxTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        let mut xml = String::new();
        archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;

        debug!("{} 大小: {} 字节", DOCUMENT_PART, xml.len());
        paragraphs_text(&xml)
    }
}

/// 纯文本提取（UTF-8，去掉 BOM）
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let text = String::from_utf8(bytes.to_vec())?;
        Ok(text.trim_start_matches('\u{feff}').to_string())
    }
}

/// 根据扩展名选择提取器
pub fn extractor_for_path(path: &Path) -> Result<Box<dyn TextExtractor>, ExtractError> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_lowercase();

    match extension.as_str() {
        "docx" => Ok(Box::new(DocxTextExtractor)),
        "txt" | "text" | "md" => Ok(Box::new(PlainTextExtractor)),
        _ => Err(ExtractError::Unsupported { extension }),
    }
}

/// 提取 document.xml 中的段落文字
fn paragraphs_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);

    let mut text = String::with_capacity(xml.len() / 4);
    let mut in_text_element = false;
    // w:pPr 中的 w:tabs/w:tab 是制表位定义，只处理 w:r 内的元素
    let mut in_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"t" => in_text_element = true,
                b"r" => in_run = true,
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"tab" if in_run => text.push('\t'),
                b"br" | b"cr" if in_run => text.push('\n'),
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text_element => {
                text.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::GeneralRef(e)) if in_text_element => {
                let resolved = match e.resolve_char_ref() {
                    Ok(Some(c)) => Some(c),
                    Ok(None) => predefined_entity(e.as_ref()),
                    Err(err) => return Err(ExtractError::Xml(err.to_string())),
                };
                if let Some(c) = resolved {
                    text.push(c);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text_element = false,
                b"r" => in_run = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Xml(e.to_string())),
            _ => {}
        }
    }

    Ok(text)
}

fn predefined_entity(name: &[u8]) -> Option<char> {
    match name {
        b"amp" => Some('&'),
        b"lt" => Some('<'),
        b"gt" => Some('>'),
        b"quot" => Some('"'),
        b"apos" => Some('\''),
        _ => None,
    }
}
