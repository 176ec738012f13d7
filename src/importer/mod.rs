// ==========================================
// 奖学金数据交换引擎 - 导入层
// ==========================================
// 职责: 外部载荷导入，生成合并后的记录列表
// 支持: JSON 导出信封, CSV, Excel (.xlsx)
// 流程: 解析 → 校验 → 去重 → 冲突合并 → 提交
// ==========================================

// 模块声明
pub mod conflict_resolver;
pub mod data_cleaner;
pub mod duplicate_detector;
pub mod error;
pub mod field_normalizer;
pub mod file_parser;
pub mod import_orchestrator;
pub mod import_validator;
pub mod importer_trait;

// 重导出核心类型
pub use conflict_resolver::ConflictResolverImpl;
pub use data_cleaner::DataCleaner;
pub use duplicate_detector::{DuplicateDetectorImpl, DEFAULT_AMOUNT_TOLERANCE};
pub use error::{ImportError, ImportResult};
pub use field_normalizer::{
    canonical_field_for_header, CanonicalField, FieldNormalizer, FieldSource,
    DEFAULT_SCHOLARSHIP_NAME,
};
pub use file_parser::{
    payload_from_file, ColumnMapping, DelimitedTextParser, SpreadsheetParser, StructuredParser,
    UniversalPayloadParser, DEFAULT_COLUMN_ORDER,
};
pub use import_orchestrator::{ImportOrchestrator, ImportRequest};
pub use import_validator::ImportValidatorImpl;

// 重导出 Trait 接口
pub use importer_trait::{ConflictResolver, DuplicateDetector, ImportValidator, PayloadParser};
