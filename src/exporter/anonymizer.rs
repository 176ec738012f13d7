// ==========================================
// 奖学金数据交换引擎 - 匿名化
// ==========================================
// 职责: 学生档案 → 分类桶（GPA 区间 / 专业大类 / 年级）
//       资金目标金额 → 规模分类；资金分析中由目标金额推导的字段清零
// ==========================================

use crate::config::GoalSizeThresholds;
use crate::domain::envelope::{
    AnonymizedGoal, AnonymizedProfile, FinancialAnalytics, GoalSizeCategory,
};
use crate::domain::scholarship::{FinancialGoalRecord, StudentProfile};

// 专业关键词（按顺序匹配，STEM 优先）
const STEM_KEYWORDS: &[&str] = &[
    "engineering",
    "computer",
    "science",
    "math",
    "physics",
    "chemistry",
    "biology",
    "technology",
    "statistics",
    "data",
    "artificial",
    "nursing",
    "medicine",
];
const BUSINESS_KEYWORDS: &[&str] = &[
    "business",
    "finance",
    "economics",
    "accounting",
    "marketing",
    "management",
    "entrepreneurship",
];
const ARTS_KEYWORDS: &[&str] = &[
    "art",
    "music",
    "history",
    "english",
    "philosophy",
    "literature",
    "design",
    "theater",
    "theatre",
    "language",
    "writing",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymizer {
    thresholds: GoalSizeThresholds,
}

impl Anonymizer {
    pub fn new(thresholds: GoalSizeThresholds) -> Self {
        Self { thresholds }
    }

    pub fn gpa_range(&self, gpa: Option<f64>) -> &'static str {
        match gpa {
            Some(g) if g >= 3.5 => "3.5-4.0",
            Some(g) if g >= 3.0 => "3.0-3.49",
            Some(g) if g >= 2.5 => "2.5-2.99",
            Some(g) if g >= 0.0 => "below 2.5",
            _ => "not provided",
        }
    }

    /// 专业大类：按单词前缀匹配关键词
    pub fn major_category(&self, major: Option<&str>) -> &'static str {
        let Some(major) = major else {
            return "Not specified";
        };
        let lowered = major.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            return "Not specified";
        }

        let hit = |keywords: &[&str]| {
            words
                .iter()
                .any(|w| keywords.iter().any(|k| w.starts_with(k)))
        };

        if hit(STEM_KEYWORDS) {
            "STEM"
        } else if hit(BUSINESS_KEYWORDS) {
            "Business"
        } else if hit(ARTS_KEYWORDS) {
            "Arts & Humanities"
        } else {
            "Other"
        }
    }

    /// 年级：毕业年份 - 当前年份
    pub fn class_standing(&self, graduation_year: Option<i32>, current_year: i32) -> &'static str {
        match graduation_year.map(|y| y - current_year) {
            None => "Unknown",
            Some(d) if d < 0 => "Graduate",
            Some(0) => "Senior",
            Some(1) => "Junior",
            Some(2) => "Sophomore",
            Some(3) => "Freshman",
            Some(_) => "Pre-college",
        }
    }

    pub fn goal_size(&self, target_amount: f64) -> GoalSizeCategory {
        if target_amount >= self.thresholds.full_funding {
            GoalSizeCategory::FullFunding
        } else if target_amount >= self.thresholds.annual_tuition {
            GoalSizeCategory::AnnualTuition
        } else if target_amount >= self.thresholds.semester_support {
            GoalSizeCategory::SemesterSupport
        } else {
            GoalSizeCategory::Supplemental
        }
    }

    pub fn anonymize_profile(&self, profile: &StudentProfile, current_year: i32) -> AnonymizedProfile {
        AnonymizedProfile {
            gpa_range: self.gpa_range(profile.gpa).to_string(),
            major_category: self.major_category(profile.major.as_deref()).to_string(),
            class_standing: self
                .class_standing(profile.graduation_year, current_year)
                .to_string(),
        }
    }

    pub fn anonymize_goal(&self, goal: &FinancialGoalRecord) -> AnonymizedGoal {
        AnonymizedGoal {
            id: goal.id.clone(),
            title: goal.title.clone(),
            goal_size: self.goal_size(goal.target_amount),
            deadline: goal.deadline,
            calculation_method: goal.calculation_method.clone(),
        }
    }

    /// 清除资金分析中可还原目标金额的字段
    ///
    /// 奖学金分桶统计与覆盖率百分比保留
    pub fn redact_analytics(&self, analytics: &mut FinancialAnalytics) {
        analytics.total_need = 0.0;
        analytics.current_savings = 0.0;
        analytics.remaining_need = 0.0;
        analytics.funding_gap = 0.0;
        analytics.gap_covered_by_pending = 0.0;
        analytics.remaining_gap_after_pending = 0.0;
    }
}
