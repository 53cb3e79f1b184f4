//! 文档解析器接口与文件实现
//!
//! DocumentStore 只做校验与编排，解析本体在 DocumentParser 后面：
//! 测试用桩替换，生产用 FileParser（PDF 走 lopdf 按页取文本，
//! DOCX 解开 zip 后用 quick-xml 读 word/document.xml）。

use std::io::Read;
use std::path::Path;

use quick_xml::events::Event;

use crate::document::store::LoadError;

/// 无显式分页符的 DOCX 按段落聚合成页时的单页字符上限
const DOCX_PAGE_CHARS: usize = 2800;

/// 支持的文档格式（由扩展名判定）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

/// 解析器接口：path 已通过存在性与扩展名校验
pub trait DocumentParser: Send + Sync {
    fn parse(&self, path: &Path, format: DocumentFormat) -> Result<Vec<String>, LoadError>;
}

/// 生产解析器：读磁盘文件，返回按序页面文本
#[derive(Default)]
pub struct FileParser;

impl DocumentParser for FileParser {
    fn parse(&self, path: &Path, format: DocumentFormat) -> Result<Vec<String>, LoadError> {
        match format {
            DocumentFormat::Pdf => parse_pdf(path),
            DocumentFormat::Docx => parse_docx(path),
        }
    }
}

/// PDF：每个物理页提取一次文本
fn parse_pdf(path: &Path) -> Result<Vec<String>, LoadError> {
    let doc = lopdf::Document::load(path).map_err(|e| LoadError::Parse(e.to_string()))?;
    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();

    let mut pages = Vec::with_capacity(page_numbers.len());
    for page_no in page_numbers {
        let text = doc
            .extract_text(&[page_no])
            .map_err(|e| LoadError::Parse(format!("page {}: {}", page_no, e)))?;
        pages.push(normalize_text(&text));
    }
    Ok(pages)
}

/// DOCX：word/document.xml 中收集文本，w:p 结束换行，
/// 显式分页符（w:br w:type="page" / w:lastRenderedPageBreak）切页；
/// 无分页符时按段落聚合为大小受限的逻辑页。
fn parse_docx(path: &Path) -> Result<Vec<String>, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::Parse(e.to_string()))?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| LoadError::Parse(format!("not a docx: {}", e)))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| LoadError::Parse(format!("missing word/document.xml: {}", e)))?
        .read_to_string(&mut xml)
        .map_err(|e| LoadError::Parse(e.to_string()))?;

    let mut pages: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut reader = quick_xml::Reader::from_str(&xml);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = e.local_name();
                let name = name.as_ref();
                let is_page_break = name == b"lastRenderedPageBreak"
                    || (name == b"br"
                        && e.attributes().flatten().any(|a| {
                            a.key.as_ref().ends_with(b"type") && a.value.as_ref() == b"page"
                        }));
                if is_page_break && !current.trim().is_empty() {
                    pages.push(normalize_text(&current));
                    current.clear();
                }
            }
            Ok(Event::Text(t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| LoadError::Parse(e.to_string()))?;
                current.push_str(&text);
            }
            Ok(Event::End(ref e)) => {
                if e.local_name().as_ref() == b"p" {
                    current.push('\n');
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(LoadError::Parse(format!("invalid document.xml: {}", e))),
        }
    }
    if !current.trim().is_empty() {
        pages.push(normalize_text(&current));
    }

    // 单页超长说明文档没有显式分页符，退化为段落聚合
    if pages.len() == 1 && pages[0].chars().count() > DOCX_PAGE_CHARS {
        let single = pages.pop().unwrap_or_default();
        pages = paginate_by_paragraphs(&single, DOCX_PAGE_CHARS);
    }
    Ok(pages)
}

/// 段落聚合：依次装入段落，超过 max_chars 时开新页；单个超长段落独占一页
fn paginate_by_paragraphs(text: &str, max_chars: usize) -> Vec<String> {
    let mut pages = Vec::new();
    let mut current = String::new();
    for para in text.split('\n').filter(|p| !p.trim().is_empty()) {
        if !current.is_empty() && current.chars().count() + para.chars().count() > max_chars {
            pages.push(current.trim().to_string());
            current = String::new();
        }
        current.push_str(para);
        current.push('\n');
    }
    if !current.trim().is_empty() {
        pages.push(current.trim().to_string());
    }
    pages
}

/// 去掉行尾空白与多余空行，保留段落结构
fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blank_run = 0usize;
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}
