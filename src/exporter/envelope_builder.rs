// ==========================================
// 奖学金数据交换引擎 - 导出信封构建器
// ==========================================
// 职责: 记录 + 选项 → ExportEnvelope
// 规则: 导出类型修正选项 → 按选项过滤字段 → 匿名化 → 元数据/分析
// 所有格式共用同一份过滤结果
// ==========================================

use crate::config::{GoalSizeThresholds, InterchangeConfigReader};
use crate::domain::envelope::{
    ExportEnvelope, ExportMetadata, ExportOptions, ExportedScholarship, GoalProjection,
    ProfileProjection,
};
use crate::domain::scholarship::{FinancialGoalRecord, ScholarshipRecord, StudentProfile};
use crate::domain::types::ExportType;
use crate::engine::{AnalyticsAggregator, EligibilityEvaluator};
use crate::exporter::anonymizer::Anonymizer;
use chrono::{DateTime, Datelike, Utc};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// 匿名导出时的导出者标识
pub const ANONYMOUS_EXPORTER: &str = "anonymous";

// ==========================================
// ExportRequest - 单次导出请求
// ==========================================
#[derive(Debug, Clone)]
pub struct ExportRequest<'a> {
    pub scholarships: &'a [ScholarshipRecord],
    pub goals: &'a [FinancialGoalRecord],
    pub profile: Option<&'a StudentProfile>,
    pub export_type: ExportType,
    pub options: ExportOptions,
    pub now: DateTime<Utc>,
}

impl<'a> ExportRequest<'a> {
    pub fn new(scholarships: &'a [ScholarshipRecord], export_type: ExportType) -> Self {
        Self {
            scholarships,
            goals: &[],
            profile: None,
            export_type,
            options: ExportOptions::default(),
            now: Utc::now(),
        }
    }

    pub fn with_goals(mut self, goals: &'a [FinancialGoalRecord]) -> Self {
        self.goals = goals;
        self
    }

    pub fn with_profile(mut self, profile: &'a StudentProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

// ==========================================
// EnvelopeBuilder
// ==========================================
pub struct EnvelopeBuilder {
    exporter_identity: String,
    export_version: String,
    anonymizer: Anonymizer,
    aggregator: AnalyticsAggregator,
    eligibility: EligibilityEvaluator,
}

impl EnvelopeBuilder {
    pub fn new(
        exporter_identity: impl Into<String>,
        export_version: impl Into<String>,
        thresholds: GoalSizeThresholds,
    ) -> Self {
        Self {
            exporter_identity: exporter_identity.into(),
            export_version: export_version.into(),
            anonymizer: Anonymizer::new(thresholds),
            aggregator: AnalyticsAggregator::new(),
            eligibility: EligibilityEvaluator::new(),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new("Scholarship Tracker", "1.0", GoalSizeThresholds::default())
    }

    pub fn from_config<C: InterchangeConfigReader + ?Sized>(config: &C) -> Self {
        Self::new(
            config.get_exporter_identity(),
            config.get_export_version(),
            config.get_goal_size_thresholds(),
        )
    }

    /// 按导出类型修正选项
    ///
    /// # 规则
    /// - full-backup: 全部包含，不匿名
    /// - template: 仅保留奖学金描述信息（匿名标记沿用调用方）
    /// - portfolio: 原样使用
    pub fn effective_options(export_type: ExportType, options: ExportOptions) -> ExportOptions {
        match export_type {
            ExportType::FullBackup => ExportOptions::all(),
            ExportType::Template => ExportOptions {
                anonymize_data: options.anonymize_data,
                ..ExportOptions::default()
            },
            ExportType::Portfolio => options,
        }
    }

    /// 构建导出信封
    #[instrument(skip(self, request), fields(export_type = %request.export_type))]
    pub fn build(&self, request: &ExportRequest<'_>) -> ExportEnvelope {
        let options = Self::effective_options(request.export_type, request.options);
        let export_day = request.now.date_naive();

        let scholarships: Vec<ExportedScholarship> = request
            .scholarships
            .iter()
            .map(|original| {
                let mut record = original.clone();
                if !options.include_application_progress {
                    record.status = None;
                }
                if !options.include_personal_responses || options.anonymize_data {
                    record.strip_personal_responses();
                }
                // 资格判定基于原始状态
                let is_eligible = options
                    .include_eligibility_criteria
                    .then(|| self.eligibility.is_eligible(original, export_day));
                ExportedScholarship {
                    record,
                    is_eligible,
                }
            })
            .collect();

        let student_profile = match (request.export_type, request.profile) {
            (ExportType::Template, _) | (_, None) => None,
            (_, Some(profile)) if options.anonymize_data => Some(ProfileProjection::Anonymized(
                self.anonymizer
                    .anonymize_profile(profile, request.now.year()),
            )),
            (_, Some(profile)) => Some(ProfileProjection::Full(profile.clone())),
        };

        let financial_goals = options.include_financial_info.then(|| {
            request
                .goals
                .iter()
                .map(|goal| {
                    if options.anonymize_data {
                        GoalProjection::Anonymized(self.anonymizer.anonymize_goal(goal))
                    } else {
                        GoalProjection::Full(goal.clone())
                    }
                })
                .collect::<Vec<_>>()
        });

        let mut status_counts = BTreeMap::new();
        if options.include_application_progress {
            for record in request.scholarships {
                let label = record.status.map(|s| s.as_label()).unwrap_or("none");
                *status_counts.entry(label.to_string()).or_insert(0) += 1;
            }
        }

        let mut analytics = self.aggregator.aggregate(request.scholarships, request.goals);
        if options.anonymize_data {
            self.anonymizer.redact_analytics(&mut analytics);
        }

        let metadata = ExportMetadata {
            total_scholarships: scholarships.len(),
            total_goals: financial_goals.as_ref().map_or(0, |g| g.len()),
            status_counts,
            options,
            analytics,
        };

        let exported_by = if options.anonymize_data {
            ANONYMOUS_EXPORTER.to_string()
        } else {
            self.exporter_identity.clone()
        };

        debug!(
            scholarships = metadata.total_scholarships,
            goals = metadata.total_goals,
            anonymized = options.anonymize_data,
            "导出信封构建完成"
        );

        ExportEnvelope {
            export_type: request.export_type,
            export_date: request.now,
            export_version: self.export_version.clone(),
            exported_by,
            scholarships,
            student_profile,
            financial_goals,
            metadata,
        }
    }
}

impl Default for EnvelopeBuilder {
    fn default() -> Self {
        Self::with_defaults()
    }
}
