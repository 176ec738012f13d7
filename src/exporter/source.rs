// ==========================================
// 奖学金数据交换引擎 - 导出数据源读取
// ==========================================
// 职责: 外部协作层提供的 JSON 数据 → 正式记录集合
// 字段别名经 FieldNormalizer 解析（与导入路径同一张表）
// 兼容: { scholarships, financialGoals|goals, studentProfile|profile } 或导出信封
// ==========================================

use crate::domain::scholarship::{FinancialGoalRecord, ScholarshipRecord, StudentProfile};
use crate::exporter::error::{ExportError, ExportResult};
use crate::importer::FieldNormalizer;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportSource {
    pub scholarships: Vec<ScholarshipRecord>,
    pub goals: Vec<FinancialGoalRecord>,
    pub profile: Option<StudentProfile>,
}

fn array<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> &'a [Value] {
    keys.iter()
        .find_map(|k| map.get(*k).and_then(|v| v.as_array()))
        .map(|v| v.as_slice())
        .unwrap_or(&[])
}

impl ExportSource {
    pub fn from_json_str(raw: &str) -> ExportResult<Self> {
        let root: Value = serde_json::from_str(raw)?;
        let normalizer = FieldNormalizer::new();

        let (items, goals, profile) = match &root {
            Value::Array(items) => (items.as_slice(), &[][..], None),
            Value::Object(map) => (
                array(map, &["scholarships"]),
                array(map, &["financialGoals", "goals"]),
                map.get("studentProfile").or_else(|| map.get("profile")),
            ),
            _ => {
                return Err(ExportError::InvalidSource(
                    "顶层必须为对象或数组".to_string(),
                ))
            }
        };

        let mut scholarships = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let Some(obj) = item.as_object() else {
                warn!(index = i, "奖学金条目不是对象，已跳过");
                continue;
            };
            match normalizer.to_record(obj, || Uuid::new_v4().to_string()) {
                Some(record) => scholarships.push(record),
                None => warn!(index = i, "奖学金截止日期缺失或无法解析，已跳过"),
            }
        }

        let goals = goals
            .iter()
            .enumerate()
            .filter_map(|(i, item)| {
                let candidate = normalizer.to_goal_candidate(item.as_object()?, i + 1);
                match (candidate.title, candidate.deadline) {
                    (Some(title), Some(deadline)) => Some(FinancialGoalRecord {
                        id: candidate.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
                        title,
                        target_amount: candidate.target_amount,
                        current_amount: candidate.current_amount,
                        deadline,
                        calculation_method: candidate
                            .calculation_method
                            .unwrap_or_else(|| "manual".to_string()),
                    }),
                    _ => {
                        warn!(index = i, "资金目标不完整，已跳过");
                        None
                    }
                }
            })
            .collect();

        // 匿名投影无法还原为档案，忽略
        let profile = profile
            .filter(|p| p.get("gpaRange").is_none())
            .and_then(|p| serde_json::from_value::<StudentProfile>(p.clone()).ok());

        let source = Self {
            scholarships,
            goals,
            profile,
        };
        debug!(
            scholarships = source.scholarships.len(),
            goals = source.goals.len(),
            has_profile = source.profile.is_some(),
            "数据源读取完成"
        );
        Ok(source)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> ExportResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}
