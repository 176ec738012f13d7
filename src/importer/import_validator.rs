// ==========================================
// 奖学金数据交换引擎 - 导入校验器实现
// ==========================================
// 阶段 2: 结构与语义校验
// 硬错误: 名称缺失 / 截止日期缺失或无法解析 / 金额非正 / 信封结构错误
// 软警告: 导出过旧 / 截止日期已过 / 资金目标不完整
// ==========================================

use crate::domain::import::{EnvelopeHeader, ParsedPayload, ValidationIssue, ValidationReport};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::importer_trait::ImportValidator;
use chrono::{DateTime, Months, NaiveDate};
use tracing::debug;

pub struct ImportValidatorImpl {
    stale_export_months: u32, // 导出过旧阈值（月）
}

impl ImportValidatorImpl {
    pub fn new(stale_export_months: u32) -> Self {
        Self {
            stale_export_months,
        }
    }

    /// 解析信封导出日期（RFC 3339 优先，其次普通日期格式）
    fn parse_export_day(raw: &str) -> Option<NaiveDate> {
        DateTime::parse_from_rfc3339(raw.trim())
            .map(|dt| dt.date_naive())
            .ok()
            .or_else(|| DataCleaner.parse_date(raw))
    }

    fn validate_envelope(
        &self,
        header: &EnvelopeHeader,
        today: NaiveDate,
        issues: &mut Vec<ValidationIssue>,
    ) {
        match header.export_date_raw.as_deref() {
            None => issues.push(ValidationIssue::error(0, "exportDate", "缺少导出日期")),
            Some(raw) => match Self::parse_export_day(raw) {
                None => issues.push(ValidationIssue::error(
                    0,
                    "exportDate",
                    format!("无法解析导出日期: {}", raw),
                )),
                Some(export_day) => {
                    let cutoff = today.checked_sub_months(Months::new(self.stale_export_months));
                    if cutoff.is_some_and(|c| export_day < c) {
                        issues.push(ValidationIssue::warning(
                            0,
                            "exportDate",
                            format!(
                                "导出文件超过 {} 个月（导出于 {}）",
                                self.stale_export_months, export_day
                            ),
                        ));
                    }
                }
            },
        }

        if !header.scholarships_is_list {
            issues.push(ValidationIssue::error(
                0,
                "scholarships",
                "scholarships 字段缺失或不是列表",
            ));
        }
    }
}

impl Default for ImportValidatorImpl {
    fn default() -> Self {
        Self::new(6)
    }
}

impl ImportValidator for ImportValidatorImpl {
    fn validate(&self, parsed: &ParsedPayload, today: NaiveDate) -> ValidationReport {
        let mut issues = Vec::new();

        if let Some(header) = &parsed.header {
            self.validate_envelope(header, today, &mut issues);
        }

        for candidate in &parsed.candidates {
            let row = candidate.row_number;

            if candidate.name.is_none() {
                issues.push(ValidationIssue::error(row, "name", "缺少名称"));
            }

            match (&candidate.deadline_raw, candidate.deadline) {
                (None, _) => issues.push(ValidationIssue::error(row, "deadline", "缺少截止日期")),
                (Some(raw), None) => issues.push(ValidationIssue::error(
                    row,
                    "deadline",
                    format!("无法解析截止日期: {}", raw),
                )),
                (Some(_), Some(deadline)) if deadline < today => {
                    issues.push(ValidationIssue::warning(
                        row,
                        "deadline",
                        format!("{} 截止日期已过: {}", candidate.display_name(), deadline),
                    ))
                }
                _ => {}
            }

            if candidate.amount <= 0.0 {
                issues.push(ValidationIssue::error(
                    row,
                    "amount",
                    format!("金额必须大于 0（实际 {}）", candidate.amount),
                ));
            }
        }

        // 资金目标不完整：跳过，不阻断
        for goal in &parsed.goals {
            if goal.title.is_none() {
                issues.push(ValidationIssue::warning(
                    goal.row_number,
                    "financialGoals.title",
                    "资金目标缺少标题，已跳过",
                ));
            } else if goal.deadline.is_none() {
                issues.push(ValidationIssue::warning(
                    goal.row_number,
                    "financialGoals.deadline",
                    format!(
                        "资金目标截止日期无法解析，已跳过: {}",
                        goal.deadline_raw.as_deref().unwrap_or("")
                    ),
                ));
            }
        }

        let report = ValidationReport { issues };
        debug!(
            errors = report.error_count(),
            warnings = report.warning_count(),
            "校验完成"
        );
        report
    }
}
