// ==========================================
// 奖学金数据交换引擎 - 字段标准化器
// ==========================================
// 职责: 别名字段 → 标准字段 + 类型转换
// 别名优先级表为唯一来源，导出读取与导入写入共用
// ==========================================

use crate::domain::import::{CandidateGoal, CandidateRecord};
use crate::domain::scholarship::{DocumentRecord, EssayRecord, ScholarshipRecord};
use crate::domain::types::ApplicationStatus;
use crate::importer::data_cleaner::DataCleaner;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

/// 名称全部缺失时的默认值（仅导出读取路径使用）
pub const DEFAULT_SCHOLARSHIP_NAME: &str = "Untitled Scholarship";

// ==========================================
// 标准字段 (Canonical Field)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    Id,
    Name,
    Organization,
    Amount,
    Deadline,
    Description,
    Requirements,
    ApplicationUrl,
    Status,
    Notes,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 10] = [
        CanonicalField::Id,
        CanonicalField::Name,
        CanonicalField::Organization,
        CanonicalField::Amount,
        CanonicalField::Deadline,
        CanonicalField::Description,
        CanonicalField::Requirements,
        CanonicalField::ApplicationUrl,
        CanonicalField::Status,
        CanonicalField::Notes,
    ];

    /// 标准字段名（camelCase，与导出信封一致）
    pub fn key(&self) -> &'static str {
        match self {
            CanonicalField::Id => "id",
            CanonicalField::Name => "name",
            CanonicalField::Organization => "organization",
            CanonicalField::Amount => "amount",
            CanonicalField::Deadline => "deadline",
            CanonicalField::Description => "description",
            CanonicalField::Requirements => "requirements",
            CanonicalField::ApplicationUrl => "applicationUrl",
            CanonicalField::Status => "status",
            CanonicalField::Notes => "notes",
        }
    }

    /// 别名表（按优先级排列，第一个非空值胜出）
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            CanonicalField::Id => &["id"],
            CanonicalField::Name => &["name", "title", "organization"],
            CanonicalField::Organization => &["organization", "provider", "sponsor"],
            CanonicalField::Amount => &["amount", "value", "award"],
            CanonicalField::Deadline => &["deadline", "dueDate", "due_date"],
            CanonicalField::Description => &["description", "details"],
            CanonicalField::Requirements => &["requirements", "requirement"],
            CanonicalField::ApplicationUrl => &["applicationUrl", "link", "url"],
            CanonicalField::Status => &["status", "applicationStatus"],
            CanonicalField::Notes => &["notes", "personalNotes"],
        }
    }
}

// 资金目标别名
const GOAL_ID_ALIASES: &[&str] = &["id"];
const GOAL_TITLE_ALIASES: &[&str] = &["title", "name"];
const GOAL_TARGET_ALIASES: &[&str] = &["targetAmount", "target"];
const GOAL_CURRENT_ALIASES: &[&str] = &["currentAmount", "saved"];
const GOAL_DEADLINE_ALIASES: &[&str] = &["deadline", "dueDate"];
const GOAL_METHOD_ALIASES: &[&str] = &["calculationMethod", "method"];

/// 表头 → 标准字段
///
/// 先匹配标准字段名，再匹配别名；比较时忽略大小写、空格、下划线、连字符
pub fn canonical_field_for_header(header: &str) -> Option<CanonicalField> {
    let wanted = squash(header);
    if wanted.is_empty() {
        return None;
    }

    CanonicalField::ALL
        .iter()
        .find(|f| squash(f.key()) == wanted)
        .or_else(|| {
            CanonicalField::ALL
                .iter()
                .find(|f| f.aliases().iter().any(|a| squash(a) == wanted))
        })
        .copied()
}

fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(|c| c.to_lowercase())
        .collect()
}

// ==========================================
// FieldSource - 字段来源
// ==========================================
// JSON 对象与表格行（列名 → 文本）都可作为来源
pub trait FieldSource {
    fn raw_value(&self, key: &str) -> Option<Value>;
}

impl FieldSource for Map<String, Value> {
    fn raw_value(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}

impl FieldSource for HashMap<String, String> {
    fn raw_value(&self, key: &str) -> Option<Value> {
        self.get(key).map(|v| Value::String(v.clone()))
    }
}

// ==========================================
// FieldNormalizer
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldNormalizer {
    cleaner: DataCleaner,
}

impl FieldNormalizer {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
        }
    }

    /// 按别名顺序取第一个非空值
    pub fn resolve<S: FieldSource + ?Sized>(&self, source: &S, aliases: &[&str]) -> Option<Value> {
        aliases
            .iter()
            .filter_map(|alias| source.raw_value(alias))
            .find(|v| !is_blank(v))
    }

    /// 按别名顺序取第一个非空文本
    pub fn resolve_text<S: FieldSource + ?Sized>(
        &self,
        source: &S,
        aliases: &[&str],
    ) -> Option<String> {
        self.resolve(source, aliases)
            .and_then(|v| value_to_text(&v))
            .and_then(|t| self.cleaner.normalize_null(Some(&t)))
    }

    pub fn field_text<S: FieldSource + ?Sized>(
        &self,
        source: &S,
        field: CanonicalField,
    ) -> Option<String> {
        self.resolve_text(source, field.aliases())
    }

    /// 名称：name → title → organization → 默认值
    pub fn name_or_default<S: FieldSource + ?Sized>(&self, source: &S) -> String {
        self.field_text(source, CanonicalField::Name)
            .unwrap_or_else(|| DEFAULT_SCHOLARSHIP_NAME.to_string())
    }

    /// 金额：数字直接取值，文本先清洗；缺失或失败为 0
    fn amount<S: FieldSource + ?Sized>(&self, source: &S, aliases: &[&str]) -> f64 {
        match self.resolve(source, aliases) {
            Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
            Some(Value::String(s)) => self.cleaner.clean_amount(&s),
            _ => 0.0,
        }
    }

    fn requirements<S: FieldSource + ?Sized>(&self, source: &S) -> Vec<String> {
        match self.resolve(source, CanonicalField::Requirements.aliases()) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(value_to_text)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            Some(Value::String(s)) => self.cleaner.split_requirements(&s),
            _ => Vec::new(),
        }
    }

    fn status<S: FieldSource + ?Sized>(&self, source: &S) -> Option<ApplicationStatus> {
        let label = self.field_text(source, CanonicalField::Status)?;
        let status = ApplicationStatus::from_label(&label);
        if status.is_none() {
            debug!(label = %label, "无法识别的申请状态，按缺省处理");
        }
        status
    }

    /// 子记录数组（文书/文件），无法反序列化的元素丢弃
    fn sub_records<S, T>(&self, source: &S, key: &str) -> Vec<T>
    where
        S: FieldSource + ?Sized,
        T: DeserializeOwned,
    {
        match source.raw_value(key) {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// 来源 → 候选记录（导入写入路径）
    ///
    /// # 参数
    /// - source: JSON 对象或表格行
    /// - row_number: 源数据行号
    ///
    /// # 返回
    /// - CandidateRecord: 名称/截止日期可能缺失，交由校验器判定
    pub fn to_candidate<S: FieldSource + ?Sized>(
        &self,
        source: &S,
        row_number: usize,
    ) -> CandidateRecord {
        let deadline_raw = self.field_text(source, CanonicalField::Deadline);
        let deadline = deadline_raw
            .as_deref()
            .and_then(|raw| self.cleaner.parse_date(raw));

        CandidateRecord {
            id: self.field_text(source, CanonicalField::Id),
            name: self.field_text(source, CanonicalField::Name),
            organization: self.field_text(source, CanonicalField::Organization),
            amount: self.amount(source, CanonicalField::Amount.aliases()),
            deadline_raw,
            deadline,
            description: self.field_text(source, CanonicalField::Description),
            requirements: self.requirements(source),
            application_url: self.field_text(source, CanonicalField::ApplicationUrl),
            status: self.status(source),
            essays: self.sub_records::<S, EssayRecord>(source, "essays"),
            documents: self.sub_records::<S, DocumentRecord>(source, "documents"),
            notes: self.field_text(source, CanonicalField::Notes),
            row_number,
        }
    }

    /// 来源 → 正式记录（导出读取路径）
    ///
    /// 名称缺失时使用默认值；截止日期无法解析返回 None
    pub fn to_record<S: FieldSource + ?Sized>(
        &self,
        source: &S,
        fallback_id: impl FnOnce() -> String,
    ) -> Option<ScholarshipRecord> {
        let mut candidate = self.to_candidate(source, 0);
        candidate.name = Some(self.name_or_default(source));
        let id = candidate.id.clone().unwrap_or_else(fallback_id);
        candidate.to_scholarship(id)
    }

    /// 来源 → 候选资金目标
    pub fn to_goal_candidate<S: FieldSource + ?Sized>(
        &self,
        source: &S,
        row_number: usize,
    ) -> CandidateGoal {
        let deadline_raw = self.resolve_text(source, GOAL_DEADLINE_ALIASES);
        let deadline = deadline_raw
            .as_deref()
            .and_then(|raw| self.cleaner.parse_date(raw));

        CandidateGoal {
            id: self.resolve_text(source, GOAL_ID_ALIASES),
            title: self.resolve_text(source, GOAL_TITLE_ALIASES),
            target_amount: self.amount(source, GOAL_TARGET_ALIASES).max(0.0),
            current_amount: self.amount(source, GOAL_CURRENT_ALIASES).max(0.0),
            deadline_raw,
            deadline,
            calculation_method: self.resolve_text(source, GOAL_METHOD_ALIASES),
            row_number,
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_name_alias_priority() {
        let normalizer = FieldNormalizer::new();

        let src = object(json!({"title": "Title Only", "organization": "Org"}));
        assert_eq!(
            normalizer.field_text(&src, CanonicalField::Name),
            Some("Title Only".to_string())
        );

        let src = object(json!({"name": "  ", "organization": "Gates Foundation"}));
        assert_eq!(
            normalizer.field_text(&src, CanonicalField::Name),
            Some("Gates Foundation".to_string())
        );

        let src = object(json!({"amount": 10}));
        assert_eq!(normalizer.name_or_default(&src), DEFAULT_SCHOLARSHIP_NAME);
    }

    #[test]
    fn test_organization_and_url_aliases() {
        let normalizer = FieldNormalizer::new();
        let src = object(json!({"sponsor": "Rotary", "provider": "Lions", "url": "https://b", "link": "https://a"}));

        let candidate = normalizer.to_candidate(&src, 1);
        assert_eq!(candidate.organization, Some("Lions".to_string()));
        assert_eq!(candidate.application_url, Some("https://a".to_string()));
    }

    #[test]
    fn test_to_candidate_from_json() {
        let normalizer = FieldNormalizer::new();
        let src = object(json!({
            "id": "s-1",
            "name": "STEM Scholars",
            "amount": "$2,500",
            "deadline": "2025-03-01",
            "requirements": ["transcript", " ", "essay"],
            "status": "in-progress",
            "essays": [{"prompt": "Why STEM?", "response": "Because."}],
            "notes": "call mentor"
        }));

        let candidate = normalizer.to_candidate(&src, 3);
        assert_eq!(candidate.id.as_deref(), Some("s-1"));
        assert_eq!(candidate.amount, 2500.0);
        assert_eq!(candidate.deadline, NaiveDate::from_ymd_opt(2025, 3, 1));
        assert_eq!(candidate.requirements, vec!["transcript", "essay"]);
        assert_eq!(candidate.status, Some(ApplicationStatus::InProgress));
        assert_eq!(candidate.essays.len(), 1);
        assert_eq!(candidate.notes.as_deref(), Some("call mentor"));
        assert_eq!(candidate.row_number, 3);
    }

    #[test]
    fn test_to_candidate_from_row() {
        let normalizer = FieldNormalizer::new();
        let mut row = HashMap::new();
        row.insert("name".to_string(), "Research Grant".to_string());
        row.insert("amount".to_string(), "$1,200".to_string());
        row.insert("deadline".to_string(), "2025-05-01".to_string());
        row.insert("requirements".to_string(), "transcript; essay".to_string());

        let candidate = normalizer.to_candidate(&row, 2);
        assert_eq!(candidate.name.as_deref(), Some("Research Grant"));
        assert_eq!(candidate.amount, 1200.0);
        assert_eq!(candidate.deadline, NaiveDate::from_ymd_opt(2025, 5, 1));
        assert_eq!(candidate.requirements, vec!["transcript", "essay"]);
        assert_eq!(candidate.organization, None);
    }

    #[test]
    fn test_unparseable_deadline_keeps_raw() {
        let normalizer = FieldNormalizer::new();
        let src = object(json!({"name": "X", "deadline": "soon"}));
        let candidate = normalizer.to_candidate(&src, 1);
        assert_eq!(candidate.deadline_raw.as_deref(), Some("soon"));
        assert_eq!(candidate.deadline, None);
    }

    #[test]
    fn test_to_record_uses_default_name() {
        let normalizer = FieldNormalizer::new();
        let src = object(json!({"amount": 500, "deadline": "2025-01-15"}));
        let record = normalizer
            .to_record(&src, || "generated".to_string())
            .unwrap();
        assert_eq!(record.name, DEFAULT_SCHOLARSHIP_NAME);
        assert_eq!(record.id, "generated");

        let src = object(json!({"name": "No date"}));
        assert!(normalizer.to_record(&src, || "x".to_string()).is_none());
    }

    #[test]
    fn test_goal_aliases() {
        let normalizer = FieldNormalizer::new();
        let src = object(json!({"name": "Tuition", "target": 20000, "saved": "5,000", "deadline": "2025-08-01"}));
        let goal = normalizer.to_goal_candidate(&src, 1);
        assert_eq!(goal.title.as_deref(), Some("Tuition"));
        assert_eq!(goal.target_amount, 20000.0);
        assert_eq!(goal.current_amount, 5000.0);
        assert_eq!(goal.deadline, NaiveDate::from_ymd_opt(2025, 8, 1));
    }

    #[test]
    fn test_header_lookup() {
        assert_eq!(canonical_field_for_header("Name"), Some(CanonicalField::Name));
        assert_eq!(canonical_field_for_header("Title"), Some(CanonicalField::Name));
        assert_eq!(
            canonical_field_for_header("Organization"),
            Some(CanonicalField::Organization)
        );
        assert_eq!(
            canonical_field_for_header("Application URL"),
            Some(CanonicalField::ApplicationUrl)
        );
        assert_eq!(
            canonical_field_for_header("due_date"),
            Some(CanonicalField::Deadline)
        );
        assert_eq!(canonical_field_for_header("Favourite Colour"), None);
    }
}
