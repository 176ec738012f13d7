// ==========================================
// 奖学金数据交换引擎 - 编码器接口与格式表
// ==========================================
// 职责: Encoder trait、导出格式 → 扩展名/文件名映射、统一入口 serialize
// 选项过滤已在 EnvelopeBuilder 完成，编码器只负责渲染
// ==========================================

use crate::domain::envelope::ExportEnvelope;
use crate::domain::types::ApplicationStatus;
use crate::exporter::delimited::{ApplicationStatusCsvEncoder, ScholarshipCsvEncoder};
use crate::exporter::error::{ExportError, ExportResult};
use crate::exporter::markup_document::MarkupDocumentEncoder;
use crate::exporter::plain_text::PlainTextEncoder;
use crate::exporter::structured::StructuredEncoder;
use crate::exporter::styled_document::StyledDocumentEncoder;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, instrument};

// ==========================================
// Encoder Trait
// ==========================================
// 实现者: StructuredEncoder, ScholarshipCsvEncoder, ApplicationStatusCsvEncoder,
//         PlainTextEncoder, StyledDocumentEncoder, MarkupDocumentEncoder
pub trait Encoder: Send + Sync {
    /// 渲染信封为目标格式文本
    fn render(&self, envelope: &ExportEnvelope) -> ExportResult<String>;
}

// ==========================================
// 导出格式 (Export Format)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Json,                 // 结构化（可回读）
    Csv,                  // 奖学金汇总行
    CsvApplicationStatus, // 申请状态行
    PlainText,            // 纯文本报告
    Rtf,                  // 富文本文档
    Html,                 // 浏览器报告
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 6] = [
        ExportFormat::Json,
        ExportFormat::Csv,
        ExportFormat::CsvApplicationStatus,
        ExportFormat::PlainText,
        ExportFormat::Rtf,
        ExportFormat::Html,
    ];

    /// 文件扩展名（边界约定，纯查表）
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv | ExportFormat::CsvApplicationStatus => "csv",
            ExportFormat::PlainText => "txt",
            ExportFormat::Rtf => "rtf",
            ExportFormat::Html => "html",
        }
    }

    pub fn as_label(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::CsvApplicationStatus => "csv-applications",
            ExportFormat::PlainText => "txt",
            ExportFormat::Rtf => "rtf",
            ExportFormat::Html => "html",
        }
    }

    pub fn encoder(&self) -> Box<dyn Encoder> {
        match self {
            ExportFormat::Json => Box::new(StructuredEncoder),
            ExportFormat::Csv => Box::new(ScholarshipCsvEncoder),
            ExportFormat::CsvApplicationStatus => Box::new(ApplicationStatusCsvEncoder),
            ExportFormat::PlainText => Box::new(PlainTextEncoder),
            ExportFormat::Rtf => Box::new(StyledDocumentEncoder),
            ExportFormat::Html => Box::new(MarkupDocumentEncoder),
        }
    }

    /// 建议文件名
    ///
    /// # 示例
    /// - scholarship-full-backup-2025-01-10.json
    /// - scholarship-applications-2025-01-10.csv
    pub fn suggested_filename(&self, envelope: &ExportEnvelope) -> String {
        let day = envelope.export_day().format("%Y-%m-%d");
        match self {
            ExportFormat::CsvApplicationStatus => {
                format!("scholarship-applications-{}.{}", day, self.extension())
            }
            _ => format!(
                "scholarship-{}-{}.{}",
                envelope.export_type.as_label(),
                day,
                self.extension()
            ),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_label())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" | "structured" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "csv-applications" | "applications" | "csv-status" => {
                Ok(ExportFormat::CsvApplicationStatus)
            }
            "txt" | "text" | "plain-text" => Ok(ExportFormat::PlainText),
            "rtf" => Ok(ExportFormat::Rtf),
            "html" | "htm" => Ok(ExportFormat::Html),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// 统一入口：按格式渲染信封
#[instrument(skip(envelope), fields(scholarships = envelope.scholarships.len()))]
pub fn serialize(envelope: &ExportEnvelope, format: ExportFormat) -> ExportResult<String> {
    let content = format.encoder().render(envelope)?;
    debug!(bytes = content.len(), "渲染完成");
    Ok(content)
}

// ==========================================
// 渲染辅助函数（各文本类编码器共用）
// ==========================================

/// 金额格式化: 1234.5 → "$1,234.50"
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// 金额原值（CSV 用，整数不带小数）
pub fn plain_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{}", amount)
    }
}

pub fn status_label(status: Option<ApplicationStatus>) -> &'static str {
    status.map(|s| s.as_label()).unwrap_or("")
}

pub fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}
