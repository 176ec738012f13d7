// ==========================================
// 奖学金数据交换引擎 - 导出模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 导出模块错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("导出格式不支持: {0}")]
    UnsupportedFormat(String),

    #[error("导出类型不支持: {0}")]
    UnsupportedExportType(String),

    #[error("JSON 序列化失败: {0}")]
    SerializationError(String),

    #[error("CSV 生成失败: {0}")]
    CsvWriteError(String),

    #[error("导出数据源无效: {0}")]
    InvalidSource(String),

    #[error("文件读写失败: {0}")]
    FileError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::SerializationError(err.to_string())
    }
}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::CsvWriteError(err.to_string())
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::FileError(err.to_string())
    }
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
