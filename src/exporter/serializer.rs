// ==========================================
// 奖学金数据交换引擎 - 导出序列化器
// ==========================================
// 职责: 构建信封 → 按格式渲染 → 建议文件名
// 文件落盘由外部协作层完成
// ==========================================

use crate::config::InterchangeConfigReader;
use crate::domain::envelope::ExportEnvelope;
use crate::exporter::encoder::{serialize, ExportFormat};
use crate::exporter::envelope_builder::{EnvelopeBuilder, ExportRequest};
use crate::exporter::error::ExportResult;
use tracing::{info, instrument};

/// 渲染结果
#[derive(Debug, Clone)]
pub struct ExportedPayload {
    pub format: ExportFormat,
    pub filename: String,
    pub content: String,
    pub envelope: ExportEnvelope,
}

pub struct ExportSerializer {
    builder: EnvelopeBuilder,
}

impl ExportSerializer {
    pub fn new(builder: EnvelopeBuilder) -> Self {
        Self { builder }
    }

    pub fn with_defaults() -> Self {
        Self::new(EnvelopeBuilder::with_defaults())
    }

    pub fn from_config<C: InterchangeConfigReader + ?Sized>(config: &C) -> Self {
        Self::new(EnvelopeBuilder::from_config(config))
    }

    pub fn builder(&self) -> &EnvelopeBuilder {
        &self.builder
    }

    /// 执行一次导出
    ///
    /// # 参数
    /// - request: 记录 + 导出类型 + 选项
    /// - format: 目标格式
    ///
    /// # 返回
    /// - Ok(ExportedPayload): 文本内容与建议文件名
    /// - Err: 渲染失败
    #[instrument(skip(self, request), fields(export_type = %request.export_type, format = %format))]
    pub fn export(
        &self,
        request: &ExportRequest<'_>,
        format: ExportFormat,
    ) -> ExportResult<ExportedPayload> {
        let envelope = self.builder.build(request);
        let content = serialize(&envelope, format)?;
        let filename = format.suggested_filename(&envelope);

        info!(
            filename = %filename,
            scholarships = envelope.metadata.total_scholarships,
            bytes = content.len(),
            "导出完成"
        );

        Ok(ExportedPayload {
            format,
            filename,
            content,
            envelope,
        })
    }
}

impl Default for ExportSerializer {
    fn default() -> Self {
        Self::with_defaults()
    }
}
