// ==========================================
// 奖学金数据交换引擎 - 数据清洗器
// ==========================================
// 职责: TRIM / NULL 标准化 / 金额清洗 / 日期解析 / 要求列表拆分
// ==========================================

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};

/// 支持的日期格式（按优先级）
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y%m%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Excel 序列日期上限（9999-12-31）
const EXCEL_SERIAL_MAX: f64 = 2_958_465.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct DataCleaner;

impl DataCleaner {
    /// 标准化 NULL 值（空字符串/空白 → None）
    pub fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// 清洗金额（去除货币符号、千分位、空白），解析失败返回 0
    ///
    /// # 示例
    /// - "$1,200" → 1200.0
    /// - "USD 5,000.50" → 5000.5
    /// - "TBD" → 0.0
    pub fn clean_amount(&self, raw: &str) -> f64 {
        let cleaned: String = raw
            .trim()
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
            .collect();

        cleaned
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    /// 解析日期
    ///
    /// # 支持格式
    /// - YYYY-MM-DD / YYYYMMDD / MM/DD/YYYY / YYYY/MM/DD
    /// - RFC 3339 时间戳（取日期部分）
    /// - Excel 序列日期（如 45678）
    pub fn parse_date(&self, value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(value, format) {
                return Some(date);
            }
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(dt.date_naive());
        }

        if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(dt.date());
        }

        self.parse_excel_serial(value)
    }

    /// 解析 Excel 序列日期（1900 日期系统，基准 1899-12-30）
    fn parse_excel_serial(&self, value: &str) -> Option<NaiveDate> {
        let integer_part = value.split('.').next().unwrap_or("");
        if integer_part.is_empty()
            || integer_part.len() > 7
            || !integer_part.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }

        let serial = value.parse::<f64>().ok()?;
        if !(1.0..=EXCEL_SERIAL_MAX).contains(&serial) {
            return None;
        }

        let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
        base.checked_add_signed(Duration::days(serial.floor() as i64))
    }

    /// 拆分申请要求（分号 / 逗号 / 换行），去除空项
    pub fn split_requirements(&self, raw: &str) -> Vec<String> {
        raw.split([';', ',', '\n', '\r'])
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_null() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.normalize_null(Some("  ")), None);
        assert_eq!(cleaner.normalize_null(Some("")), None);
        assert_eq!(
            cleaner.normalize_null(Some("  value  ")),
            Some("value".to_string())
        );
        assert_eq!(cleaner.normalize_null(None), None);
    }

    #[test]
    fn test_clean_amount() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.clean_amount("$1,200"), 1200.0);
        assert_eq!(cleaner.clean_amount(" USD 5,000.50 "), 5000.5);
        assert_eq!(cleaner.clean_amount("€750"), 750.0);
        assert_eq!(cleaner.clean_amount("TBD"), 0.0);
        assert_eq!(cleaner.clean_amount(""), 0.0);
    }

    #[test]
    fn test_parse_date_formats() {
        let cleaner = DataCleaner;
        let expected = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        assert_eq!(cleaner.parse_date("2025-05-01"), Some(expected));
        assert_eq!(cleaner.parse_date("20250501"), Some(expected));
        assert_eq!(cleaner.parse_date("05/01/2025"), Some(expected));
        assert_eq!(cleaner.parse_date("2025-05-01T10:30:00Z"), Some(expected));
        assert_eq!(cleaner.parse_date("2025-05-01T10:30:00"), Some(expected));
    }

    #[test]
    fn test_parse_date_excel_serial() {
        let cleaner = DataCleaner;
        // 45778 = 2025-05-01
        assert_eq!(
            cleaner.parse_date("45778"),
            Some(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap())
        );
        assert_eq!(
            cleaner.parse_date("45778.75"),
            Some(NaiveDate::from_ymd_opt(2025, 5, 1).unwrap())
        );
    }

    #[test]
    fn test_parse_date_invalid() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.parse_date("next spring"), None);
        assert_eq!(cleaner.parse_date("2025-13-45"), None);
        assert_eq!(cleaner.parse_date(""), None);
    }

    #[test]
    fn test_split_requirements() {
        let cleaner = DataCleaner;
        assert_eq!(
            cleaner.split_requirements("transcript; essay"),
            vec!["transcript".to_string(), "essay".to_string()]
        );
        assert_eq!(
            cleaner.split_requirements("a,b\nc;;  ; d"),
            vec!["a", "b", "c", "d"]
        );
        assert!(cleaner.split_requirements(" ; , ").is_empty());
    }
}
