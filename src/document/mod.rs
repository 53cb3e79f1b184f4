//! 文档层：存储、阅读游标与解析器接口

pub mod parser;
pub mod store;

pub use parser::{DocumentFormat, DocumentParser, FileParser};
pub use store::{
    Document, DocumentStore, DocumentSummary, LoadError, NavigationError, PageCommand,
    NO_DOCUMENT_MSG,
};
