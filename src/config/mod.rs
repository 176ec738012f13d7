// ==========================================
// 奖学金数据交换引擎 - 配置层
// ==========================================
// 职责: 去重阈值、过期判定、导出标识等可调参数
// 存储: 键值配置（JSON 文件）
// ==========================================

pub mod config_manager;
pub mod interchange_config_trait;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use interchange_config_trait::{GoalSizeThresholds, InterchangeConfigReader};
