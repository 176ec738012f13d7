// ==========================================
// 奖学金数据交换引擎 - 重复检测器实现
// ==========================================
// 阶段 3: 现有记录 × 候选记录 匹配
// 规则: 名称匹配 AND (金额差 < 容差 OR 截止日期相同)
// 多重匹配: 取现有集合中的第一条
// ==========================================

use crate::domain::scholarship::ScholarshipRecord;
use crate::importer::importer_trait::DuplicateDetector;

/// 默认金额容差
pub const DEFAULT_AMOUNT_TOLERANCE: f64 = 100.0;

pub struct DuplicateDetectorImpl {
    amount_tolerance: f64,
}

impl DuplicateDetectorImpl {
    pub fn new(amount_tolerance: f64) -> Self {
        Self { amount_tolerance }
    }

    /// 名称标准化：去首尾空白、合并内部空白、小写
    pub fn normalize_name(name: &str) -> String {
        name.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

impl Default for DuplicateDetectorImpl {
    fn default() -> Self {
        Self::new(DEFAULT_AMOUNT_TOLERANCE)
    }
}

impl DuplicateDetector for DuplicateDetectorImpl {
    fn is_duplicate(&self, a: &ScholarshipRecord, b: &ScholarshipRecord) -> bool {
        if Self::normalize_name(&a.name) != Self::normalize_name(&b.name) {
            return false;
        }

        let amount_match = (a.amount - b.amount).abs() < self.amount_tolerance;
        let deadline_match = a.deadline == b.deadline;
        amount_match || deadline_match
    }
}
