// ==========================================
// 奖学金数据交换引擎 - 导出层
// ==========================================
// 职责: 记录集合 → 导出信封 → 目标格式文本
// 支持: JSON, CSV（汇总/申请状态）, TXT, RTF, HTML
// ==========================================

pub mod anonymizer;
pub mod delimited;
pub mod encoder;
pub mod envelope_builder;
pub mod error;
pub mod markup_document;
pub mod plain_text;
pub mod report;
pub mod serializer;
pub mod source;
pub mod structured;
pub mod styled_document;

// 重导出核心类型
pub use anonymizer::Anonymizer;
pub use delimited::{ApplicationStatusCsvEncoder, ScholarshipCsvEncoder};
pub use encoder::{serialize, Encoder, ExportFormat};
pub use envelope_builder::{EnvelopeBuilder, ExportRequest, ANONYMOUS_EXPORTER};
pub use error::{ExportError, ExportResult};
pub use markup_document::MarkupDocumentEncoder;
pub use plain_text::PlainTextEncoder;
pub use serializer::{ExportSerializer, ExportedPayload};
pub use source::ExportSource;
pub use structured::StructuredEncoder;
pub use styled_document::StyledDocumentEncoder;
