// ==========================================
// 奖学金数据交换引擎 - 导入领域模型
// ==========================================
// 用途: 导入管道中间产物与最终结果
// 流程: ImportPayload → ParsedPayload(CandidateRecord) → ImportOutcome
// ==========================================

use crate::domain::scholarship::{
    DocumentRecord, EssayRecord, FinancialGoalRecord, ScholarshipRecord,
};
use crate::domain::types::{
    ApplicationStatus, ConflictType, ImportStage, IssueLevel, MergeStrategy, Resolution,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// ImportPayload - 导入源数据
// ==========================================
// 文件读取由外部协作层完成，引擎只接收内存数据
#[derive(Debug, Clone)]
pub enum ImportPayload {
    Structured(String),    // JSON 导出信封
    DelimitedText(String), // CSV 文本
    Spreadsheet(Vec<u8>),  // .xlsx 字节
}

impl ImportPayload {
    pub fn source_kind(&self) -> &'static str {
        match self {
            ImportPayload::Structured(_) => "structured",
            ImportPayload::DelimitedText(_) => "delimited-text",
            ImportPayload::Spreadsheet(_) => "spreadsheet",
        }
    }
}

// ==========================================
// ImportOptions - 导入合并选项
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOptions {
    #[serde(default)]
    pub merge_strategy: MergeStrategy,
    #[serde(default = "default_true")]
    pub auto_resolve_conflicts: bool,
    #[serde(default)]
    pub preserve_existing_progress: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            merge_strategy: MergeStrategy::default(),
            auto_resolve_conflicts: true,
            preserve_existing_progress: false,
        }
    }
}

impl ImportOptions {
    pub fn with_strategy(merge_strategy: MergeStrategy) -> Self {
        Self {
            merge_strategy,
            ..Self::default()
        }
    }
}

// ==========================================
// CandidateRecord - 候选记录（已解析、未校验）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub organization: Option<String>,
    pub amount: f64, // 已清洗；解析失败为 0
    pub deadline_raw: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub description: Option<String>,
    pub requirements: Vec<String>,
    pub application_url: Option<String>,
    pub status: Option<ApplicationStatus>,
    pub essays: Vec<EssayRecord>,
    pub documents: Vec<DocumentRecord>,
    pub notes: Option<String>,

    // 元信息
    pub row_number: usize, // 源数据行号（从 1 开始）
}

impl CandidateRecord {
    pub fn empty(row_number: usize) -> Self {
        Self {
            id: None,
            name: None,
            organization: None,
            amount: 0.0,
            deadline_raw: None,
            deadline: None,
            description: None,
            requirements: Vec::new(),
            application_url: None,
            status: None,
            essays: Vec::new(),
            documents: Vec::new(),
            notes: None,
            row_number,
        }
    }

    /// 转换为正式记录（名称与截止日期缺一不可）
    pub fn to_scholarship(&self, id: String) -> Option<ScholarshipRecord> {
        let name = self.name.clone()?;
        let deadline = self.deadline?;
        Some(ScholarshipRecord {
            id,
            name,
            organization: self.organization.clone().unwrap_or_default(),
            amount: self.amount.max(0.0),
            deadline,
            description: self.description.clone().unwrap_or_default(),
            requirements: self.requirements.clone(),
            application_url: self.application_url.clone(),
            status: self.status,
            essays: self.essays.clone(),
            documents: self.documents.clone(),
            notes: self.notes.clone(),
        })
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("(未命名)")
    }
}

// ==========================================
// CandidateGoal - 候选资金目标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateGoal {
    pub id: Option<String>,
    pub title: Option<String>,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline_raw: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub calculation_method: Option<String>,
    pub row_number: usize,
}

// ==========================================
// EnvelopeHeader - 结构化载荷的信封头
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeHeader {
    pub export_type: Option<String>,
    pub export_date_raw: Option<String>,
    pub export_version: Option<String>,
    pub exported_by: Option<String>,
    pub scholarships_is_list: bool,
}

// ==========================================
// ParsedPayload - 解析阶段输出
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPayload {
    pub header: Option<EnvelopeHeader>, // 仅结构化输入
    pub candidates: Vec<CandidateRecord>,
    pub goals: Vec<CandidateGoal>,
}

// ==========================================
// ValidationIssue - 校验问题
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationIssue {
    pub level: IssueLevel,
    pub row_number: usize, // 0 表示信封级问题
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn error(row_number: usize, field: &str, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Error,
            row_number,
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn warning(row_number: usize, field: &str, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Warning,
            row_number,
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.level, IssueLevel::Error)
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            IssueLevel::Error => "错误",
            IssueLevel::Warning => "警告",
        };
        if self.row_number == 0 {
            write!(f, "[{}] {}: {}", level, self.field, self.message)
        } else {
            write!(
                f,
                "[{}] 第 {} 行 {}: {}",
                level, self.row_number, self.field, self.message
            )
        }
    }
}

// ==========================================
// ValidationReport - 校验报告
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// 零硬错误即有效，与警告数量无关
    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues.iter().filter(|i| !i.is_error()).count()
    }
}

// ==========================================
// ConflictRecord - 冲突记录（审计用）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictRecord {
    pub conflict_type: ConflictType,
    pub scholarship_name: String,
    pub existing: ScholarshipRecord,
    pub incoming: ScholarshipRecord,
    pub resolution: Resolution,
}

// ==========================================
// ImportSummary - 导入汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub scholarships_imported: usize,
    pub duplicates_found: usize,
    pub conflicts_resolved: usize,
    pub goals_imported: usize,
}

// ==========================================
// CommittedRecords - 提交后的完整记录列表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommittedRecords {
    pub scholarships: Vec<ScholarshipRecord>,
    pub goals: Vec<FinancialGoalRecord>,
}

// ==========================================
// ImportOutcome - 导入结果
// ==========================================
// 全有或全无：Rejected 时 records 为 None
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub success: bool,
    pub summary: ImportSummary,
    pub conflicts: Vec<ConflictRecord>,
    pub errors: Vec<String>,
    pub issues: Vec<ValidationIssue>,
    pub final_stage: ImportStage,
    pub stages: Vec<ImportStage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records: Option<CommittedRecords>,
}

impl ImportOutcome {
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| !i.is_error())
    }
}
