// ==========================================
// 奖学金数据交换引擎 - 导出信封模型
// ==========================================
// 用途: 单次导出的顶层可序列化容器
// 字段: exportType / exportDate / exportVersion / exportedBy /
//       scholarships[] / studentProfile? / financialGoals[]? / metadata
// ==========================================

use crate::domain::scholarship::{FinancialGoalRecord, ScholarshipRecord, StudentProfile};
use crate::domain::types::ExportType;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// ExportOptions - 导出选项
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    #[serde(default)]
    pub include_personal_responses: bool, // 文书/文件/备注
    #[serde(default)]
    pub include_eligibility_criteria: bool, // 附加 isEligible
    #[serde(default)]
    pub include_application_progress: bool, // 附加 status
    #[serde(default)]
    pub include_financial_info: bool, // 附加资金目标
    #[serde(default)]
    pub anonymize_data: bool, // 个人信息替换为分类摘要
}

impl ExportOptions {
    /// 全部包含、不匿名
    pub fn all() -> Self {
        Self {
            include_personal_responses: true,
            include_eligibility_criteria: true,
            include_application_progress: true,
            include_financial_info: true,
            anonymize_data: false,
        }
    }
}

// ==========================================
// ExportedScholarship - 导出后的奖学金条目
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedScholarship {
    #[serde(flatten)]
    pub record: ScholarshipRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_eligible: Option<bool>,
}

// ==========================================
// ProfileProjection - 学生档案投影
// ==========================================
// 匿名化时整体替换为分类桶
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileProjection {
    Anonymized(AnonymizedProfile),
    Full(StudentProfile),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnonymizedProfile {
    pub gpa_range: String,
    pub major_category: String,
    pub class_standing: String,
}

// ==========================================
// GoalProjection - 资金目标投影
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GoalProjection {
    Anonymized(AnonymizedGoal),
    Full(FinancialGoalRecord),
}

/// 匿名化资金目标：不含金额，仅保留规模分类
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnonymizedGoal {
    pub id: String,
    pub title: String,
    pub goal_size: GoalSizeCategory,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub calculation_method: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalSizeCategory {
    FullFunding,      // >= 50k
    AnnualTuition,    // >= 20k
    SemesterSupport,  // >= 10k
    Supplemental,     // < 10k
}

impl GoalSizeCategory {
    pub fn as_label(&self) -> &'static str {
        match self {
            GoalSizeCategory::FullFunding => "full-funding",
            GoalSizeCategory::AnnualTuition => "annual-tuition",
            GoalSizeCategory::SemesterSupport => "semester-support",
            GoalSizeCategory::Supplemental => "supplemental",
        }
    }
}

// ==========================================
// FinancialAnalytics - 资金分析结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialAnalytics {
    // ===== 分桶统计 =====
    pub awarded_count: usize,
    pub applied_count: usize,
    pub draft_count: usize,
    pub total_awarded: f64,
    pub total_applied: f64,
    pub total_draft: f64,
    pub active_applications: usize,

    // ===== 资金目标汇总 =====
    pub total_need: f64,
    pub current_savings: f64,

    // ===== 派生指标 =====
    pub remaining_need: f64,
    pub funding_gap: f64,
    pub gap_covered_by_pending: f64,
    pub remaining_gap_after_pending: f64,
    pub gap_coverage_percentage: f64,
    pub application_success_rate: f64,
    pub average_award_amount: f64,
}

// ==========================================
// ExportMetadata - 信封元数据
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub total_scholarships: usize,
    pub total_goals: usize,
    #[serde(default)]
    pub status_counts: BTreeMap<String, usize>,
    pub options: ExportOptions,
    pub analytics: FinancialAnalytics,
}

// ==========================================
// ExportEnvelope - 导出信封
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub export_type: ExportType,
    pub export_date: DateTime<Utc>,
    pub export_version: String,
    pub exported_by: String,
    pub scholarships: Vec<ExportedScholarship>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_profile: Option<ProfileProjection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub financial_goals: Option<Vec<GoalProjection>>,
    pub metadata: ExportMetadata,
}

impl ExportEnvelope {
    pub fn options(&self) -> &ExportOptions {
        &self.metadata.options
    }

    pub fn export_day(&self) -> NaiveDate {
        self.export_date.date_naive()
    }
}
