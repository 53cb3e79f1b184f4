//! 工具箱：document_loader、page_reader、voice_control、web_search 与执行器

pub mod document_loader;
pub mod executor;
pub mod page_reader;
pub mod registry;
pub mod schema;
pub mod voice_control;
pub mod web_search;

pub use document_loader::DocumentLoaderTool;
pub use executor::ToolExecutor;
pub use page_reader::PageReaderTool;
pub use registry::{Tool, ToolRegistry};
pub use schema::tool_call_schema_json;
pub use voice_control::VoiceControlTool;
pub use web_search::WebSearchTool;
