// ==========================================
// 奖学金数据交换引擎 - 纯文本报告编码器
// ==========================================

use crate::domain::envelope::ExportEnvelope;
use crate::exporter::encoder::Encoder;
use crate::exporter::error::ExportResult;
use crate::exporter::report::{Field, ReportView};
use std::fmt::Write;

pub struct PlainTextEncoder;

fn write_section(out: &mut String, title: &str, fields: &[Field]) -> std::fmt::Result {
    if fields.is_empty() {
        return Ok(());
    }
    writeln!(out, "{}", title.to_uppercase())?;
    writeln!(out, "{}", "-".repeat(title.chars().count()))?;
    for (label, value) in fields {
        writeln!(out, "{}: {}", label, value)?;
    }
    writeln!(out)
}

impl PlainTextEncoder {
    fn write_report(&self, view: &ReportView) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        writeln!(out, "{}", view.title.to_uppercase())?;
        writeln!(out, "{}", "=".repeat(view.title.chars().count()))?;
        for (label, value) in &view.header {
            writeln!(out, "{}: {}", label, value)?;
        }
        writeln!(out)?;

        write_section(&mut out, "Student Profile", &view.profile)?;
        write_section(&mut out, "Summary", &view.summary)?;

        writeln!(out, "SCHOLARSHIPS")?;
        writeln!(out, "------------")?;
        if view.scholarships.is_empty() {
            writeln!(out, "(none)")?;
        }
        for (i, entry) in view.scholarships.iter().enumerate() {
            writeln!(out, "{}. {}", i + 1, entry.title)?;
            for (label, value) in &entry.fields {
                // 多行值缩进对齐
                let value = value.replace('\n', "\n     ");
                writeln!(out, "   {}: {}", label, value)?;
            }
            writeln!(out)?;
        }

        if let Some(goals) = &view.goals {
            writeln!(out, "FINANCIAL GOALS")?;
            writeln!(out, "---------------")?;
            for goal in goals {
                writeln!(out, "- {}", goal)?;
            }
        }
        Ok(out)
    }
}

impl Encoder for PlainTextEncoder {
    fn render(&self, envelope: &ExportEnvelope) -> ExportResult<String> {
        let view = ReportView::from_envelope(envelope);
        self.write_report(&view)
            .map_err(|e| anyhow::anyhow!("文本报告生成失败: {}", e).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exporter::test_support::sample_envelope;

    #[test]
    fn test_plain_text_report() {
        let text = PlainTextEncoder.render(&sample_envelope()).unwrap();
        assert!(text.starts_with("SCHOLARSHIP EXPORT REPORT\n"));
        assert!(text.contains("Export type: full-backup"));
        assert!(text.contains("1. Research Grant"));
        assert!(text.contains("   Amount: $1,200.00"));
        assert!(text.contains("FINANCIAL GOALS"));
        assert!(text.contains("- Tuition: $5,000.00 of $20,000.00 by 2025-08-01"));
    }

    #[test]
    fn test_empty_envelope() {
        let mut envelope = sample_envelope();
        envelope.scholarships.clear();
        envelope.financial_goals = None;
        let text = PlainTextEncoder.render(&envelope).unwrap();
        assert!(text.contains("(none)"));
        assert!(!text.contains("FINANCIAL GOALS"));
    }
}
