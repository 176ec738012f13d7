// ==========================================
// 奖学金数据交换引擎 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 仅覆盖“载荷无法解析”类致命错误；
//       字段缺失/重复等预期情况以 ValidationIssue / ConflictRecord 表达
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 载荷相关错误 =====
    #[error("载荷格式不支持: {0}")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("结构化载荷格式错误: {0}")]
    MalformedPayload(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    // ===== 行结构错误 =====
    #[error("列数不一致 (行 {row}): 期望 {expected} 列，实际 {actual} 列")]
    RowArityMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("列映射错误: {0}")]
    ColumnMappingError(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::MalformedPayload(err.to_string())
    }
}

// 实现 From<csv::Error>（列数不一致单独归类）
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::UnequalLengths {
                pos,
                expected_len,
                len,
            } => ImportError::RowArityMismatch {
                row: pos.as_ref().map(|p| p.line() as usize).unwrap_or(0),
                expected: *expected_len as usize,
                actual: *len as usize,
            },
            _ => ImportError::CsvParseError(err.to_string()),
        }
    }
}

// 实现 From<calamine::XlsxError>
impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
