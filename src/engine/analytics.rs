// ==========================================
// 奖学金数据交换引擎 - 资金分析聚合器
// ==========================================
// 职责: 单次遍历奖学金集合 + 资金目标集合，输出资金缺口统计
// 输入: &[ScholarshipRecord], &[FinancialGoalRecord]
// 输出: FinancialAnalytics（嵌入导出元数据）
// ==========================================

use crate::domain::envelope::FinancialAnalytics;
use crate::domain::scholarship::{FinancialGoalRecord, ScholarshipRecord};
use crate::domain::types::StatusBucket;

// ==========================================
// AnalyticsAggregator - 资金分析聚合器
// ==========================================
// 红线: 无状态，所有方法都是纯函数
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsAggregator;

impl AnalyticsAggregator {
    pub fn new() -> Self {
        Self
    }

    /// 计算资金分析
    ///
    /// # 规则
    /// - awarded/received → 已获奖桶；submitted/in-progress → 已申请桶；draft/缺省 → 草稿桶
    /// - remainingNeed = max(0, need - savings - awarded)
    /// - fundingGap = max(0, need - awarded - savings)
    /// - gapCoveredByPending = min(gap, applied)
    /// - remainingGapAfterPending = max(0, gap - applied)
    /// - gapCoveragePercentage = need > 0 ? (awarded + savings) / need * 100 : 100（上限 100）
    /// - applicationSuccessRate = active > 0 ? awardedCount / active * 100 : 0（保留一位小数）
    /// - averageAwardAmount = awardedCount > 0 ? awarded / awardedCount : 0
    pub fn aggregate(
        &self,
        scholarships: &[ScholarshipRecord],
        goals: &[FinancialGoalRecord],
    ) -> FinancialAnalytics {
        let mut analytics = FinancialAnalytics::default();

        // 1. 奖学金分桶（单次遍历）
        for scholarship in scholarships {
            let amount = scholarship.amount.max(0.0);
            match StatusBucket::classify(scholarship.status) {
                StatusBucket::Awarded => {
                    analytics.awarded_count += 1;
                    analytics.total_awarded += amount;
                }
                StatusBucket::Applied => {
                    analytics.applied_count += 1;
                    analytics.total_applied += amount;
                }
                StatusBucket::Draft => {
                    analytics.draft_count += 1;
                    analytics.total_draft += amount;
                }
            }
        }
        analytics.active_applications = analytics.awarded_count + analytics.applied_count;

        // 2. 资金目标汇总
        for goal in goals {
            analytics.total_need += goal.target_amount.max(0.0);
            analytics.current_savings += goal.current_amount.max(0.0);
        }

        // 3. 派生指标
        let need = analytics.total_need;
        let covered = analytics.total_awarded + analytics.current_savings;

        analytics.remaining_need =
            (need - analytics.current_savings - analytics.total_awarded).max(0.0);
        analytics.funding_gap =
            (need - analytics.total_awarded - analytics.current_savings).max(0.0);
        analytics.gap_covered_by_pending = analytics.funding_gap.min(analytics.total_applied);
        analytics.remaining_gap_after_pending =
            (analytics.funding_gap - analytics.total_applied).max(0.0);

        analytics.gap_coverage_percentage = if need > 0.0 {
            (covered / need * 100.0).min(100.0)
        } else {
            100.0
        };

        analytics.application_success_rate = if analytics.active_applications > 0 {
            round_one_decimal(
                analytics.awarded_count as f64 / analytics.active_applications as f64 * 100.0,
            )
        } else {
            0.0
        };

        analytics.average_award_amount = if analytics.awarded_count > 0 {
            analytics.total_awarded / analytics.awarded_count as f64
        } else {
            0.0
        };

        analytics
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
