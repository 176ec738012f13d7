// ==========================================
// 奖学金数据交换引擎 - 申请资格判定
// ==========================================
// 职责: 计算导出条目的 isEligible 标记
// 规则: 截止日期 >= 导出日 且 尚未获奖（awarded/received）
// ==========================================

use crate::domain::scholarship::ScholarshipRecord;
use crate::domain::types::StatusBucket;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityEvaluator;

impl EligibilityEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// 判定是否仍可申请
    ///
    /// # 返回
    /// - (bool, String): 判定结果与原因
    pub fn evaluate(&self, record: &ScholarshipRecord, as_of: NaiveDate) -> (bool, String) {
        if record.deadline < as_of {
            return (false, format!("截止日期 {} 已过", record.deadline));
        }
        if StatusBucket::classify(record.status) == StatusBucket::Awarded {
            return (false, "已获奖".to_string());
        }
        (true, "可申请".to_string())
    }

    pub fn is_eligible(&self, record: &ScholarshipRecord, as_of: NaiveDate) -> bool {
        self.evaluate(record, as_of).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ApplicationStatus;

    fn record(deadline: NaiveDate, status: Option<ApplicationStatus>) -> ScholarshipRecord {
        ScholarshipRecord {
            id: "s1".to_string(),
            name: "Merit Award".to_string(),
            organization: "Org".to_string(),
            amount: 1000.0,
            deadline,
            description: String::new(),
            requirements: Vec::new(),
            application_url: None,
            status,
            essays: Vec::new(),
            documents: Vec::new(),
            notes: None,
        }
    }

    #[test]
    fn test_deadline_on_export_day_is_eligible() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let evaluator = EligibilityEvaluator::new();
        assert!(evaluator.is_eligible(&record(day, None), day));
    }

    #[test]
    fn test_past_deadline_not_eligible() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let deadline = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap();
        let (eligible, reason) = EligibilityEvaluator::new().evaluate(&record(deadline, None), day);
        assert!(!eligible);
        assert!(reason.contains("已过"));
    }

    #[test]
    fn test_awarded_not_eligible() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let deadline = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let evaluator = EligibilityEvaluator::new();
        assert!(!evaluator.is_eligible(&record(deadline, Some(ApplicationStatus::Received)), day));
        assert!(evaluator.is_eligible(&record(deadline, Some(ApplicationStatus::Submitted)), day));
    }
}
