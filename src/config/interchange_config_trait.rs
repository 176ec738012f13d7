// ==========================================
// 奖学金数据交换引擎 - 配置读取 Trait
// ==========================================
// 职责: 定义导入/导出所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::domain::types::MergeStrategy;

/// 资金目标规模分档阈值（美元）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalSizeThresholds {
    pub full_funding: f64,
    pub annual_tuition: f64,
    pub semester_support: f64,
}

impl Default for GoalSizeThresholds {
    fn default() -> Self {
        Self {
            full_funding: 50_000.0,
            annual_tuition: 20_000.0,
            semester_support: 10_000.0,
        }
    }
}

// ==========================================
// InterchangeConfigReader Trait
// ==========================================
// 实现者: ConfigManager（键值配置）
pub trait InterchangeConfigReader: Send + Sync {
    // ===== 去重配置 =====

    /// 金额近似阈值（严格小于该差值视为同一奖学金）
    ///
    /// # 默认值
    /// - 100.0
    fn get_duplicate_amount_tolerance(&self) -> f64;

    // ===== 校验配置 =====

    /// 导出文件过期月数（超过则警告）
    ///
    /// # 默认值
    /// - 6
    fn get_stale_export_months(&self) -> u32;

    // ===== 导出配置 =====

    /// 导出者标识
    ///
    /// # 默认值
    /// - "Scholarship Tracker"
    fn get_exporter_identity(&self) -> String;

    /// 导出格式版本号
    ///
    /// # 默认值
    /// - "1.0"
    fn get_export_version(&self) -> String;

    /// 匿名化资金目标分档阈值
    ///
    /// # 默认值
    /// - 50000 / 20000 / 10000
    fn get_goal_size_thresholds(&self) -> GoalSizeThresholds;

    // ===== 导入配置 =====

    /// 默认合并策略
    ///
    /// # 默认值
    /// - merge
    fn get_default_merge_strategy(&self) -> MergeStrategy;
}
