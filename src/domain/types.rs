// ==========================================
// 奖学金数据交换引擎 - 领域类型定义
// ==========================================
// 职责: 状态枚举、导出类型、合并策略、冲突标签
// 序列化格式: kebab-case（与导出文件一致）
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 申请状态 (Application Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApplicationStatus {
    Draft,      // 草稿
    InProgress, // 填写中
    Submitted,  // 已提交
    Awarded,    // 已获奖
    Received,   // 已到账
}

impl ApplicationStatus {
    /// 宽松解析状态标签（大小写/空格/下划线不敏感）
    ///
    /// # 返回
    /// - Some(status): 可识别的状态
    /// - None: 空值或未知标签
    pub fn from_label(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "draft" | "not-started" => Some(ApplicationStatus::Draft),
            "in-progress" | "inprogress" => Some(ApplicationStatus::InProgress),
            "submitted" | "applied" => Some(ApplicationStatus::Submitted),
            "awarded" | "won" => Some(ApplicationStatus::Awarded),
            "received" => Some(ApplicationStatus::Received),
            _ => None,
        }
    }

    pub fn as_label(&self) -> &'static str {
        match self {
            ApplicationStatus::Draft => "draft",
            ApplicationStatus::InProgress => "in-progress",
            ApplicationStatus::Submitted => "submitted",
            ApplicationStatus::Awarded => "awarded",
            ApplicationStatus::Received => "received",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

// ==========================================
// 状态分桶 (Status Bucket)
// ==========================================
// 每条记录恰好落入一个桶；缺省状态视为草稿
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBucket {
    Awarded, // awarded / received
    Applied, // submitted / in-progress
    Draft,   // draft / 缺省
}

impl StatusBucket {
    pub fn classify(status: Option<ApplicationStatus>) -> Self {
        match status {
            Some(ApplicationStatus::Awarded) | Some(ApplicationStatus::Received) => {
                StatusBucket::Awarded
            }
            Some(ApplicationStatus::Submitted) | Some(ApplicationStatus::InProgress) => {
                StatusBucket::Applied
            }
            Some(ApplicationStatus::Draft) | None => StatusBucket::Draft,
        }
    }
}

// ==========================================
// 导出类型 (Export Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportType {
    FullBackup, // 完整备份
    Template,   // 模板（不含进度）
    Portfolio,  // 作品集（按选项过滤）
}

impl ExportType {
    pub fn as_label(&self) -> &'static str {
        match self {
            ExportType::FullBackup => "full-backup",
            ExportType::Template => "template",
            ExportType::Portfolio => "portfolio",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "full-backup" | "full_backup" | "backup" => Some(ExportType::FullBackup),
            "template" => Some(ExportType::Template),
            "portfolio" => Some(ExportType::Portfolio),
            _ => None,
        }
    }
}

impl fmt::Display for ExportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

// ==========================================
// 合并策略 (Merge Strategy)
// ==========================================
// 每次导入选定一次，不按记录切换
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MergeStrategy {
    Replace,
    #[default]
    Merge,
    SkipDuplicates,
}

impl MergeStrategy {
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "replace" => Some(MergeStrategy::Replace),
            "merge" => Some(MergeStrategy::Merge),
            "skip-duplicates" | "skip_duplicates" | "skip" => Some(MergeStrategy::SkipDuplicates),
            _ => None,
        }
    }
}

impl fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeStrategy::Replace => write!(f, "replace"),
            MergeStrategy::Merge => write!(f, "merge"),
            MergeStrategy::SkipDuplicates => write!(f, "skip-duplicates"),
        }
    }
}

// ==========================================
// 冲突解决结果 (Resolution)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Replace, // 导入记录整体覆盖
    Merge,   // 描述字段取导入值
    Skip,    // 保留现有记录
    Manual,  // 未自动处理，进入人工队列
}

impl Resolution {
    /// 是否计入 conflictsResolved
    pub fn counts_as_resolved(&self) -> bool {
        matches!(self, Resolution::Replace | Resolution::Merge)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Replace => write!(f, "replace"),
            Resolution::Merge => write!(f, "merge"),
            Resolution::Skip => write!(f, "skip"),
            Resolution::Manual => write!(f, "manual"),
        }
    }
}

// ==========================================
// 冲突类型 (Conflict Type)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictType {
    DuplicateScholarship, // 与现有记录重复
}

// ==========================================
// 校验级别 (Issue Level)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueLevel {
    Error,   // 阻断提交
    Warning, // 仅记录
}

// ==========================================
// 导入阶段 (Import Stage)
// ==========================================
// 流转: Parsed → Validated → DuplicatesDetected → Resolved → Committed
// 任一硬错误/解析失败 → Rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportStage {
    Parsed,
    Validated,
    DuplicatesDetected,
    Resolved,
    Committed,
    Rejected,
}

impl ImportStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ImportStage::Committed | ImportStage::Rejected)
    }

    /// 合法流转（终态不可再流转）
    pub fn can_transition_to(&self, next: ImportStage) -> bool {
        match (self, next) {
            (ImportStage::Parsed, ImportStage::Validated)
            | (ImportStage::Validated, ImportStage::DuplicatesDetected)
            | (ImportStage::DuplicatesDetected, ImportStage::Resolved)
            | (ImportStage::Resolved, ImportStage::Committed) => true,
            (ImportStage::Parsed, ImportStage::Rejected)
            | (ImportStage::Validated, ImportStage::Rejected) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ImportStage::Parsed => "PARSED",
            ImportStage::Validated => "VALIDATED",
            ImportStage::DuplicatesDetected => "DUPLICATES_DETECTED",
            ImportStage::Resolved => "RESOLVED",
            ImportStage::Committed => "COMMITTED",
            ImportStage::Rejected => "REJECTED",
        };
        write!(f, "{}", label)
    }
}
