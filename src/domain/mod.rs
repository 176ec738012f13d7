// ==========================================
// 奖学金数据交换引擎 - 领域模型层
// ==========================================
// 职责: 定义记录、信封、导入结果等领域类型
// 红线: 不含解析/渲染逻辑，不含持久化
// ==========================================

pub mod envelope;
pub mod import;
pub mod scholarship;
pub mod types;

// 重导出核心类型
pub use envelope::{
    AnonymizedGoal, AnonymizedProfile, ExportEnvelope, ExportMetadata, ExportOptions,
    ExportedScholarship, FinancialAnalytics, GoalProjection, GoalSizeCategory, ProfileProjection,
};
pub use import::{
    CandidateGoal, CandidateRecord, CommittedRecords, ConflictRecord, EnvelopeHeader,
    ImportOptions, ImportOutcome, ImportPayload, ImportSummary, ParsedPayload, ValidationIssue,
    ValidationReport,
};
pub use scholarship::{
    DocumentRecord, EssayRecord, FinancialGoalRecord, ScholarshipRecord, StudentProfile,
};
pub use types::{
    ApplicationStatus, ConflictType, ExportType, ImportStage, IssueLevel, MergeStrategy,
    Resolution, StatusBucket,
};
