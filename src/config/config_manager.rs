// ==========================================
// 奖学金数据交换引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、快照/恢复
// 存储: 键值表（JSON 对象文件，值统一为字符串）
// ==========================================

use crate::config::interchange_config_trait::{GoalSizeThresholds, InterchangeConfigReader};
use crate::domain::types::MergeStrategy;
use serde_json::Value;
use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: BTreeMap<String, String>,
}

impl ConfigManager {
    /// 创建空配置（全部取默认值）
    pub fn new() -> Self {
        Self::default()
    }

    /// 从键值对创建
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// 从 JSON 对象文件加载
    ///
    /// # 说明
    /// - 非字符串值按 JSON 文本存储（数字 100 → "100"）
    /// - 文件不存在时返回空配置
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "配置文件不存在，使用默认配置");
            return Ok(Self::new());
        }

        let raw = std::fs::read_to_string(path)?;
        let manager = Self::from_json_str(&raw)?;
        tracing::info!(path = %path.display(), keys = manager.values.len(), "配置加载完成");
        Ok(manager)
    }

    /// 从 JSON 对象文本解析
    pub fn from_json_str(raw: &str) -> Result<Self, Box<dyn Error>> {
        let parsed: BTreeMap<String, Value> = serde_json::from_str(raw)?;
        let values = parsed
            .into_iter()
            .map(|(k, v)| {
                let text = match v {
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                (k, text)
            })
            .collect();
        Ok(Self { values })
    }

    /// 默认配置文件路径: <config_dir>/scholarship-interchange/config.json
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("scholarship-interchange").join("config.json"))
    }

    /// 读取配置值
    pub fn get_config_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|v| v.as_str())
    }

    /// 写入配置值
    pub fn set_config_value(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// 读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> String {
        self.get_config_value(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    /// 读取数值配置，格式错误时回退默认值并告警
    fn get_parsed_or_default<T: std::str::FromStr>(&self, key: &str, default: T) -> T {
        match self.get_config_value(key) {
            None => default,
            Some(raw) => raw.trim().parse::<T>().unwrap_or_else(|_| {
                tracing::warn!(config_key = key, raw_value = %raw, "配置值格式错误，使用默认值");
                default
            }),
        }
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        Ok(serde_json::to_string(&self.values)?)
    }

    /// 从配置快照恢复配置
    ///
    /// # 返回
    /// - Ok(usize): 恢复的配置项数量
    pub fn restore_config_from_snapshot(
        &mut self,
        snapshot_json: &str,
    ) -> Result<usize, Box<dyn Error>> {
        let config_map: BTreeMap<String, String> = serde_json::from_str(snapshot_json)?;
        let count = config_map.len();
        for (key, value) in config_map {
            self.values.insert(key, value);
        }
        Ok(count)
    }
}

// ==========================================
// InterchangeConfigReader Trait 实现
// ==========================================
impl InterchangeConfigReader for ConfigManager {
    fn get_duplicate_amount_tolerance(&self) -> f64 {
        let value = self.get_parsed_or_default(config_keys::DUPLICATE_AMOUNT_TOLERANCE, 100.0);
        if value < 0.0 {
            100.0
        } else {
            value
        }
    }

    fn get_stale_export_months(&self) -> u32 {
        self.get_parsed_or_default(config_keys::STALE_EXPORT_MONTHS, 6)
    }

    fn get_exporter_identity(&self) -> String {
        self.get_config_or_default(config_keys::EXPORTER_IDENTITY, "Scholarship Tracker")
    }

    fn get_export_version(&self) -> String {
        self.get_config_or_default(config_keys::EXPORT_VERSION, "1.0")
    }

    fn get_goal_size_thresholds(&self) -> GoalSizeThresholds {
        let value = self.get_config_or_default(config_keys::GOAL_SIZE_THRESHOLDS, "50000,20000,10000");

        let parsed: Vec<f64> = value
            .split(',')
            .filter_map(|s| s.trim().parse::<f64>().ok())
            .collect();

        match parsed.as_slice() {
            [full, annual, semester] if full >= annual && annual >= semester => {
                GoalSizeThresholds {
                    full_funding: *full,
                    annual_tuition: *annual,
                    semester_support: *semester,
                }
            }
            _ => {
                tracing::warn!(raw_value = %value, "资金目标分档阈值格式错误，使用默认值");
                GoalSizeThresholds::default()
            }
        }
    }

    fn get_default_merge_strategy(&self) -> MergeStrategy {
        let value = self.get_config_or_default(config_keys::DEFAULT_MERGE_STRATEGY, "merge");
        MergeStrategy::from_label(&value).unwrap_or_default()
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 去重
    pub const DUPLICATE_AMOUNT_TOLERANCE: &str = "duplicate_amount_tolerance";

    // 校验
    pub const STALE_EXPORT_MONTHS: &str = "stale_export_months";

    // 导出
    pub const EXPORTER_IDENTITY: &str = "exporter_identity";
    pub const EXPORT_VERSION: &str = "export_version";
    pub const GOAL_SIZE_THRESHOLDS: &str = "goal_size_thresholds"; // "50000,20000,10000"

    // 导入
    pub const DEFAULT_MERGE_STRATEGY: &str = "default_merge_strategy";
}
