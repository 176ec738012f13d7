// ==========================================
// 奖学金数据交换引擎 - 计算引擎层
// ==========================================
// 职责: 导出/导入共用的纯计算（资金分析、申请资格）
// 红线: 无状态、无 I/O
// ==========================================

pub mod analytics;
pub mod eligibility;

// 重导出核心引擎
pub use analytics::AnalyticsAggregator;
pub use eligibility::EligibilityEvaluator;
