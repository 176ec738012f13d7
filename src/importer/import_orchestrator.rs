// ==========================================
// 奖学金数据交换引擎 - 导入编排器
// ==========================================
// 职责: 整合导入流程，从载荷到提交后的记录列表
// 流程: 解析 → 校验 → 去重 → 冲突合并 → 提交
// 状态: Parsed → Validated → DuplicatesDetected → Resolved → Committed
//       解析失败 / 硬错误 → Rejected（全有或全无）
// ==========================================

use crate::config::InterchangeConfigReader;
use crate::domain::import::{
    CommittedRecords, ImportOptions, ImportOutcome, ImportPayload, ImportSummary, ParsedPayload,
    ValidationIssue,
};
use crate::domain::scholarship::{FinancialGoalRecord, ScholarshipRecord};
use crate::domain::types::ImportStage;
use crate::importer::conflict_resolver::ConflictResolverImpl;
use crate::importer::duplicate_detector::DuplicateDetectorImpl;
use crate::importer::file_parser::{ColumnMapping, UniversalPayloadParser};
use crate::importer::import_validator::ImportValidatorImpl;
use crate::importer::importer_trait::{
    ConflictResolver, DuplicateDetector, ImportValidator, PayloadParser,
};
use chrono::{NaiveDate, Utc};
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// ImportRequest - 单次导入请求
// ==========================================
#[derive(Debug, Clone)]
pub struct ImportRequest<'a> {
    pub payload: &'a ImportPayload,
    pub column_mapping: Option<&'a ColumnMapping>,
    pub existing_scholarships: &'a [ScholarshipRecord],
    pub existing_goals: &'a [FinancialGoalRecord],
    pub options: ImportOptions,
    pub today: NaiveDate, // 导入当日（截止日期/过期判定基准）
}

impl<'a> ImportRequest<'a> {
    pub fn new(payload: &'a ImportPayload, existing_scholarships: &'a [ScholarshipRecord]) -> Self {
        Self {
            payload,
            column_mapping: None,
            existing_scholarships,
            existing_goals: &[],
            options: ImportOptions::default(),
            today: Utc::now().date_naive(),
        }
    }

    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_mapping(mut self, mapping: &'a ColumnMapping) -> Self {
        self.column_mapping = Some(mapping);
        self
    }

    pub fn with_goals(mut self, goals: &'a [FinancialGoalRecord]) -> Self {
        self.existing_goals = goals;
        self
    }

    pub fn on(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}

// ==========================================
// ImportOrchestrator - 导入编排器
// ==========================================
pub struct ImportOrchestrator {
    parser: Box<dyn PayloadParser>,
    validator: Box<dyn ImportValidator>,
    detector: Box<dyn DuplicateDetector>,
    resolver: Box<dyn ConflictResolver>,
}

impl ImportOrchestrator {
    /// 创建导入编排器
    ///
    /// # 参数
    /// - parser: 载荷解析器
    /// - validator: 导入校验器
    /// - detector: 重复检测器
    /// - resolver: 冲突合并器
    pub fn new(
        parser: Box<dyn PayloadParser>,
        validator: Box<dyn ImportValidator>,
        detector: Box<dyn DuplicateDetector>,
        resolver: Box<dyn ConflictResolver>,
    ) -> Self {
        Self {
            parser,
            validator,
            detector,
            resolver,
        }
    }

    /// 使用默认组件（容差 100，过期 6 个月）
    pub fn with_defaults() -> Self {
        Self::new(
            Box::new(UniversalPayloadParser),
            Box::new(ImportValidatorImpl::default()),
            Box::new(DuplicateDetectorImpl::default()),
            Box::new(ConflictResolverImpl::new()),
        )
    }

    /// 按配置构造组件
    pub fn from_config<C: InterchangeConfigReader + ?Sized>(config: &C) -> Self {
        Self::new(
            Box::new(UniversalPayloadParser),
            Box::new(ImportValidatorImpl::new(config.get_stale_export_months())),
            Box::new(DuplicateDetectorImpl::new(
                config.get_duplicate_amount_tolerance(),
            )),
            Box::new(ConflictResolverImpl::new()),
        )
    }

    /// 执行一次导入
    ///
    /// # 返回
    /// - ImportOutcome: 成功时携带提交后的完整记录列表；Rejected 时 records 为 None
    #[instrument(skip(self, request), fields(source = request.payload.source_kind()))]
    pub fn run(&self, request: &ImportRequest<'_>) -> ImportOutcome {
        info!(
            strategy = %request.options.merge_strategy,
            existing = request.existing_scholarships.len(),
            "开始导入"
        );
        let mut stages = Vec::new();

        // === 阶段 1: 解析 ===
        let parsed = match self.parser.parse(request.payload, request.column_mapping) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(error = %e, "载荷解析失败");
                stages.push(ImportStage::Rejected);
                return Self::rejected(stages, vec![format!("解析失败: {}", e)], Vec::new());
            }
        };
        advance(&mut stages, ImportStage::Parsed);
        debug!(
            candidates = parsed.candidates.len(),
            goals = parsed.goals.len(),
            "解析完成"
        );

        // === 阶段 2: 校验 ===
        let report = self.validator.validate(&parsed, request.today);
        let mut issues = report.issues.clone();
        if !report.is_valid() {
            warn!(errors = report.error_count(), "校验未通过，拒绝导入");
            advance(&mut stages, ImportStage::Rejected);
            let errors = issues.iter().map(|i| i.to_string()).collect();
            return Self::rejected(stages, errors, issues);
        }
        advance(&mut stages, ImportStage::Validated);

        let incoming = match self.to_records(&parsed, request.existing_scholarships) {
            Some(records) => records,
            None => {
                advance(&mut stages, ImportStage::Rejected);
                return Self::rejected(
                    stages,
                    vec!["内部错误: 已校验记录无法转换".to_string()],
                    issues,
                );
            }
        };

        // === 阶段 3: 去重 ===
        for (first, later) in self.detector.detect_within(&incoming) {
            issues.push(ValidationIssue::warning(
                parsed.candidates[later].row_number,
                "name",
                format!(
                    "{} 与第 {} 行重复（同一载荷内）",
                    incoming[later].name, parsed.candidates[first].row_number
                ),
            ));
        }
        let matches = self
            .detector
            .detect(&incoming, request.existing_scholarships);
        advance(&mut stages, ImportStage::DuplicatesDetected);

        // === 阶段 4: 冲突合并 ===
        let mut summary = ImportSummary::default();
        let mut conflicts = Vec::new();
        let mut merged = request.existing_scholarships.to_vec();

        for (record, matched) in incoming.into_iter().zip(matches) {
            match matched {
                Some(index) => {
                    summary.duplicates_found += 1;
                    // 同一现有记录被多次命中时，基于已更新的状态继续处理
                    let (resolved, conflict) =
                        self.resolver
                            .resolve(&merged[index], &record, &request.options);
                    if conflict.resolution.counts_as_resolved() {
                        summary.conflicts_resolved += 1;
                    }
                    merged[index] = resolved;
                    conflicts.push(conflict);
                }
                None => {
                    summary.scholarships_imported += 1;
                    merged.push(record);
                }
            }
        }
        advance(&mut stages, ImportStage::Resolved);

        let goals = self.merge_goals(&parsed, request.existing_goals, &mut issues, &mut summary);

        // === 阶段 5: 提交 ===
        advance(&mut stages, ImportStage::Committed);
        info!(
            imported = summary.scholarships_imported,
            duplicates = summary.duplicates_found,
            resolved = summary.conflicts_resolved,
            goals = summary.goals_imported,
            warnings = issues.len(),
            "导入完成"
        );

        ImportOutcome {
            success: true,
            summary,
            conflicts,
            errors: issues.iter().map(|i| i.to_string()).collect(),
            issues,
            final_stage: ImportStage::Committed,
            stages,
            records: Some(CommittedRecords {
                scholarships: merged,
                goals,
            }),
        }
    }

    /// 候选记录 → 正式记录（分配不冲突的 ID）
    fn to_records(
        &self,
        parsed: &ParsedPayload,
        existing: &[ScholarshipRecord],
    ) -> Option<Vec<ScholarshipRecord>> {
        let mut used: HashSet<String> = existing.iter().map(|r| r.id.clone()).collect();
        parsed
            .candidates
            .iter()
            .map(|candidate| {
                let id = fresh_id(candidate.id.as_deref(), &mut used);
                candidate.to_scholarship(id)
            })
            .collect()
    }

    /// 资金目标导入（标题 + 截止日期相同视为已存在）
    fn merge_goals(
        &self,
        parsed: &ParsedPayload,
        existing: &[FinancialGoalRecord],
        issues: &mut Vec<ValidationIssue>,
        summary: &mut ImportSummary,
    ) -> Vec<FinancialGoalRecord> {
        let mut goals = existing.to_vec();
        let mut used: HashSet<String> = existing.iter().map(|g| g.id.clone()).collect();

        for candidate in &parsed.goals {
            // 不完整目标已由校验器记录警告
            let (Some(title), Some(deadline)) = (&candidate.title, candidate.deadline) else {
                continue;
            };

            let key = DuplicateDetectorImpl::normalize_name(title);
            if goals
                .iter()
                .any(|g| DuplicateDetectorImpl::normalize_name(&g.title) == key && g.deadline == deadline)
            {
                issues.push(ValidationIssue::warning(
                    candidate.row_number,
                    "financialGoals",
                    format!("资金目标已存在，已跳过: {}", title),
                ));
                continue;
            }

            goals.push(FinancialGoalRecord {
                id: fresh_id(candidate.id.as_deref(), &mut used),
                title: title.clone(),
                target_amount: candidate.target_amount,
                current_amount: candidate.current_amount,
                deadline,
                calculation_method: candidate
                    .calculation_method
                    .clone()
                    .unwrap_or_else(|| "manual".to_string()),
            });
            summary.goals_imported += 1;
        }

        goals
    }

    fn rejected(
        stages: Vec<ImportStage>,
        errors: Vec<String>,
        issues: Vec<ValidationIssue>,
    ) -> ImportOutcome {
        ImportOutcome {
            success: false,
            summary: ImportSummary::default(),
            conflicts: Vec::new(),
            errors,
            issues,
            final_stage: ImportStage::Rejected,
            stages,
            records: None,
        }
    }
}

/// 记录阶段流转
fn advance(stages: &mut Vec<ImportStage>, next: ImportStage) {
    debug_assert!(stages
        .last()
        .map_or(next == ImportStage::Parsed, |s| s.can_transition_to(next)));
    debug!(stage = %next, "阶段流转");
    stages.push(next);
}

/// 沿用候选 ID（不与已用 ID 冲突时），否则生成新 UUID
fn fresh_id(candidate_id: Option<&str>, used: &mut HashSet<String>) -> String {
    let id = match candidate_id {
        Some(id) if !used.contains(id) => id.to_string(),
        _ => Uuid::new_v4().to_string(),
    };
    used.insert(id.clone());
    id
}
