//! 文档存储与阅读游标
//!
//! load 成功时整体替换当前文档并把游标重置到第 0 页；失败时原文档保持不变。
//! 页面导航是一个小状态机：NoDocument 状态下任何命令返回固定提示（不是错误），
//! Ready 状态下越界移动被拒绝且游标不变。

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::document::parser::{DocumentFormat, DocumentParser};

/// NoDocument 状态下所有页面命令的固定回复（引导调用方先加载文档）
pub const NO_DOCUMENT_MSG: &str =
    "No document is loaded. Use the document_loader tool with a .pdf or .docx file path first.";

/// 加载失败：坏路径 / 不支持的扩展名 / 解析器报错
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Unsupported format '{0}' (only .pdf and .docx are supported)")]
    UnsupportedFormat(String),

    #[error("Failed to parse document: {0}")]
    Parse(String),
}

/// 页面导航失败：目标页号越界（游标保持不变）
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Invalid page number {requested}: document has pages 1 to {page_count}")]
    InvalidPage { requested: usize, page_count: usize },
}

/// 已加载文档：名称与按序的页面文本，加载后不可变
#[derive(Clone, Debug)]
pub struct Document {
    pub name: String,
    pub pages: Vec<String>,
}

impl Document {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// 加载结果摘要
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentSummary {
    pub name: String,
    pub page_count: usize,
}

impl fmt::Display for DocumentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Loaded '{}' ({} pages)", self.name, self.page_count)
    }
}

/// 页面命令（边界处从字符串解析，内部调度为穷尽匹配）
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageCommand {
    ReadCurrent,
    Next,
    Previous,
    /// 1 起始页号
    Goto(usize),
    Summary,
    PageCount,
}

impl PageCommand {
    /// 解析 page_reader 工具的命令字符串：
    /// read_current_page / next_page / previous_page / go_to_page:<n> / document_summary / page_count
    pub fn parse(input: &str) -> Result<Self, String> {
        let input = input.trim();
        match input {
            "read_current_page" => Ok(Self::ReadCurrent),
            "next_page" => Ok(Self::Next),
            "previous_page" => Ok(Self::Previous),
            "document_summary" => Ok(Self::Summary),
            "page_count" => Ok(Self::PageCount),
            _ => {
                if let Some(num) = input.strip_prefix("go_to_page:") {
                    let n: usize = num
                        .trim()
                        .parse()
                        .map_err(|_| format!("Invalid page number: '{}'", num.trim()))?;
                    Ok(Self::Goto(n))
                } else {
                    Err(format!(
                        "Unknown page_reader command: '{}'. Valid commands: read_current_page, \
                         next_page, previous_page, go_to_page:<n>, document_summary, page_count",
                        input
                    ))
                }
            }
        }
    }
}

/// 文档存储：当前文档（可能尚未加载）与阅读游标
///
/// 游标不变量：有文档时恒在 [0, page_count) 内。
pub struct DocumentStore {
    parser: Arc<dyn DocumentParser>,
    document: Option<Document>,
    cursor: usize,
}

impl DocumentStore {
    pub fn new(parser: Arc<dyn DocumentParser>) -> Self {
        Self {
            parser,
            document: None,
            cursor: 0,
        }
    }

    /// 加载文档：校验扩展名与文件存在性，解析交给 DocumentParser。
    /// 成功时替换全部旧内容并将游标重置为 0；失败时旧文档不动。
    pub fn load(&mut self, path: &Path) -> Result<DocumentSummary, LoadError> {
        let format = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => DocumentFormat::Pdf,
            Some(ext) if ext.eq_ignore_ascii_case("docx") => DocumentFormat::Docx,
            other => {
                return Err(LoadError::UnsupportedFormat(
                    other.unwrap_or("(none)").to_string(),
                ))
            }
        };
        if !path.is_file() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }

        let pages = self.parser.parse(path, format)?;
        if pages.is_empty() {
            return Err(LoadError::Parse("document contains no pages".to_string()));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let page_count = pages.len();

        tracing::info!(name = %name, pages = page_count, "document loaded");
        self.document = Some(Document { name: name.clone(), pages });
        self.cursor = 0;

        Ok(DocumentSummary { name, page_count })
    }

    pub fn current_document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// 当前游标（0 起始）；未加载文档时无意义
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// 执行页面命令。NoDocument 状态统一返回固定提示；
    /// 仅越界 goto 返回 NavigationError，其余边界情况（首/末页的 next/previous）
    /// 是带提示语的 no-op。
    pub fn apply(&mut self, cmd: PageCommand) -> Result<String, NavigationError> {
        let Some(doc) = self.document.as_ref() else {
            return Ok(NO_DOCUMENT_MSG.to_string());
        };
        let count = doc.page_count();

        match cmd {
            PageCommand::ReadCurrent => Ok(render_page(doc, self.cursor)),
            PageCommand::Next => {
                if self.cursor + 1 < count {
                    self.cursor += 1;
                    Ok(render_page(doc, self.cursor))
                } else {
                    Ok(format!("Already at the last page ({})", count))
                }
            }
            PageCommand::Previous => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    Ok(render_page(doc, self.cursor))
                } else {
                    Ok("Already at the first page (1)".to_string())
                }
            }
            PageCommand::Goto(n) => {
                if n >= 1 && n <= count {
                    self.cursor = n - 1;
                    Ok(render_page(doc, self.cursor))
                } else {
                    Err(NavigationError::InvalidPage {
                        requested: n,
                        page_count: count,
                    })
                }
            }
            PageCommand::Summary => Ok(format!(
                "Document: {} ({} pages), currently at page {}",
                doc.name,
                count,
                self.cursor + 1
            )),
            PageCommand::PageCount => Ok(format!("{} pages", count)),
        }
    }

}

/// 带位置头的页面文本，如 "Page 2/10 (slides.pdf)"
fn render_page(doc: &Document, index: usize) -> String {
    format!(
        "Page {}/{} ({})\n\n{}",
        index + 1,
        doc.page_count(),
        doc.name,
        doc.pages[index]
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// 固定页面的解析器桩：路径校验仍走 DocumentStore，本体解析被替换
    struct StubParser {
        pages: Vec<String>,
    }

    impl DocumentParser for StubParser {
        fn parse(&self, _path: &Path, _format: DocumentFormat) -> Result<Vec<String>, LoadError> {
            Ok(self.pages.clone())
        }
    }

    fn store_with_pages(pages: &[&str]) -> (DocumentStore, tempfile::NamedTempFile) {
        let parser = StubParser {
            pages: pages.iter().map(|s| s.to_string()).collect(),
        };
        let mut store = DocumentStore::new(Arc::new(parser));
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"%PDF-stub").unwrap();
        store.load(file.path()).unwrap();
        (store, file)
    }

    #[test]
    fn load_rejects_unsupported_extension() {
        let mut store = DocumentStore::new(Arc::new(StubParser { pages: vec![] }));
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let err = store.load(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(_)));
        assert!(store.current_document().is_none());
    }

    #[test]
    fn load_rejects_missing_file() {
        let mut store = DocumentStore::new(Arc::new(StubParser { pages: vec![] }));
        let err = store.load(Path::new("/nonexistent/slides.pdf")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn load_resets_cursor_and_reports_summary() {
        let (store, _f) = store_with_pages(&["a", "b", "c"]);
        assert_eq!(store.cursor(), 0);
        assert_eq!(store.current_document().unwrap().page_count(), 3);
    }

    #[test]
    fn next_walks_to_last_page_then_notices() {
        let (mut store, _f) = store_with_pages(&["a", "b", "c"]);
        // N-1 次 next 到达末页
        assert!(store.apply(PageCommand::Next).unwrap().contains("Page 2/3"));
        assert!(store.apply(PageCommand::Next).unwrap().contains("Page 3/3"));
        assert_eq!(store.cursor(), 2);
        // 再 next 是 no-op 提示
        let notice = store.apply(PageCommand::Next).unwrap();
        assert_eq!(notice, "Already at the last page (3)");
        assert_eq!(store.cursor(), 2);
    }

    #[test]
    fn previous_at_first_page_is_noop_notice() {
        let (mut store, _f) = store_with_pages(&["a", "b"]);
        let notice = store.apply(PageCommand::Previous).unwrap();
        assert_eq!(notice, "Already at the first page (1)");
        assert_eq!(store.cursor(), 0);
    }

    #[test]
    fn goto_in_range_moves_out_of_range_rejected() {
        let (mut store, _f) = store_with_pages(&["a", "b", "c"]);
        assert!(store.apply(PageCommand::Goto(2)).unwrap().contains("Page 2/3"));
        assert_eq!(store.cursor(), 1);

        for bad in [0usize, 4, 100] {
            let err = store.apply(PageCommand::Goto(bad)).unwrap_err();
            assert_eq!(
                err,
                NavigationError::InvalidPage {
                    requested: bad,
                    page_count: 3
                }
            );
            assert_eq!(store.cursor(), 1);
        }
    }

    #[test]
    fn reload_replaces_document_wholesale() {
        let (mut store, _f) = store_with_pages(&["old 1", "old 2", "old 3"]);
        store.apply(PageCommand::Goto(3)).unwrap();

        let parser = StubParser {
            pages: vec!["new only page".to_string()],
        };
        store.parser = Arc::new(parser);
        let mut file = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        file.write_all(b"PK-stub").unwrap();
        let summary = store.load(file.path()).unwrap();

        assert_eq!(summary.page_count, 1);
        assert_eq!(store.cursor(), 0);
        let read = store.apply(PageCommand::ReadCurrent).unwrap();
        assert!(read.contains("new only page"));
        assert!(!read.contains("old"));
    }

    #[test]
    fn commands_without_document_return_fixed_guidance() {
        let mut store = DocumentStore::new(Arc::new(StubParser { pages: vec![] }));
        for cmd in [
            PageCommand::ReadCurrent,
            PageCommand::Next,
            PageCommand::Previous,
            PageCommand::Goto(1),
            PageCommand::Summary,
            PageCommand::PageCount,
        ] {
            assert_eq!(store.apply(cmd).unwrap(), NO_DOCUMENT_MSG);
        }
    }

    #[test]
    fn three_page_scenario() {
        let (mut store, _f) = store_with_pages(&["intro", "body", "end"]);
        let first = store.apply(PageCommand::ReadCurrent).unwrap();
        assert!(first.contains("Page 1/3"));
        assert!(first.contains("intro"));

        store.apply(PageCommand::Next).unwrap();
        store.apply(PageCommand::Next).unwrap();
        assert_eq!(
            store.apply(PageCommand::Next).unwrap(),
            "Already at the last page (3)"
        );

        let second = store.apply(PageCommand::Goto(2)).unwrap();
        assert!(second.contains("Page 2/3"));
        assert!(second.contains("body"));
    }

    #[test]
    fn parse_page_commands() {
        assert_eq!(
            PageCommand::parse("read_current_page").unwrap(),
            PageCommand::ReadCurrent
        );
        assert_eq!(
            PageCommand::parse("go_to_page:5").unwrap(),
            PageCommand::Goto(5)
        );
        assert_eq!(
            PageCommand::parse(" next_page ").unwrap(),
            PageCommand::Next
        );
        assert!(PageCommand::parse("go_to_page:abc").is_err());
        assert!(PageCommand::parse("jump_around").is_err());
    }
}
