// ==========================================
// 奖学金申请追踪 - 数据交换引擎核心库
// ==========================================
// 职责: 导出序列化、导入解析与校验、去重、冲突合并、资金分析
// 系统定位: 纯计算引擎（文件读写/界面由外部协作层负责）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录与信封
pub mod domain;

// 引擎层 - 资金分析/申请资格
pub mod engine;

// 导入层 - 外部数据
pub mod importer;

// 导出层 - 信封与多格式渲染
pub mod exporter;

// 配置层 - 可调参数
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    ApplicationStatus, ConflictType, ExportType, ImportStage, IssueLevel, MergeStrategy,
    Resolution, StatusBucket,
};

// 领域实体
pub use domain::{
    CommittedRecords, ConflictRecord, ExportEnvelope, ExportOptions, FinancialAnalytics,
    FinancialGoalRecord, ImportOptions, ImportOutcome, ImportPayload, ScholarshipRecord,
    StudentProfile,
};

// 引擎
pub use engine::{AnalyticsAggregator, EligibilityEvaluator};

// 导入/导出入口
pub use exporter::{ExportFormat, ExportRequest, ExportSerializer, ExportSource, ExportedPayload};
pub use importer::{ColumnMapping, ImportOrchestrator, ImportRequest};

// 配置
pub use config::{ConfigManager, InterchangeConfigReader};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "奖学金数据交换引擎";
