// ==========================================
// 奖学金数据交换引擎 - 奖学金/资金目标领域模型
// ==========================================
// 用途: 外部 UI 层创建，引擎只读；导入时由引擎构造新实例
// 序列化: camelCase（与导出信封字段一致）
// ==========================================

use crate::domain::types::ApplicationStatus;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// ScholarshipRecord - 奖学金记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarshipRecord {
    pub id: String,
    pub name: String,
    pub organization: String,
    pub amount: f64,          // 金额（>= 0）
    pub deadline: NaiveDate,  // 截止日期
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: Vec<String>, // 申请要求（有序）

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_url: Option<String>,

    // ===== 申请进度 =====
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ApplicationStatus>,

    // ===== 个人材料 =====
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub essays: Vec<EssayRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub documents: Vec<DocumentRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ScholarshipRecord {
    /// 是否带有个人材料（文书/文件/备注）
    pub fn has_personal_responses(&self) -> bool {
        !self.essays.is_empty() || !self.documents.is_empty() || self.notes.is_some()
    }

    /// 去除个人材料
    pub fn strip_personal_responses(&mut self) {
        self.essays.clear();
        self.documents.clear();
        self.notes = None;
    }
}

// ==========================================
// EssayRecord - 申请文书
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EssayRecord {
    #[serde(default)]
    pub id: String,
    pub prompt: String,
    #[serde(default)]
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_limit: Option<u32>,
    #[serde(default)]
    pub completed: bool,
}

impl EssayRecord {
    pub fn word_count(&self) -> usize {
        self.response.split_whitespace().count()
    }
}

// ==========================================
// DocumentRecord - 申请文件
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub kind: String, // transcript / recommendation / resume ...
    #[serde(default)]
    pub submitted: bool,
}

// ==========================================
// FinancialGoalRecord - 资金目标
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialGoalRecord {
    pub id: String,
    pub title: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub calculation_method: String, // 计算方式标签（manual / tuition-estimate ...）
}

// ==========================================
// StudentProfile - 学生档案（导出投影的来源）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_year: Option<i32>,
}
