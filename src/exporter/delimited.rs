// ==========================================
// 奖学金数据交换引擎 - 分隔文本编码器（CSV）
// ==========================================
// 两种行形态: 奖学金汇总 / 申请状态
// 引号规则: 含分隔符、引号、换行的字段加引号，内部引号加倍
// 汇总列顺序与导入的默认位置映射一致
// ==========================================

use crate::domain::envelope::{ExportEnvelope, ExportedScholarship};
use crate::exporter::encoder::{plain_amount, status_label, yes_no, Encoder};
use crate::exporter::error::{ExportError, ExportResult};
use csv::{QuoteStyle, WriterBuilder};

const SUMMARY_HEADER: [&str; 10] = [
    "Name",
    "Amount",
    "Deadline",
    "Requirements",
    "Organization",
    "Description",
    "Application URL",
    "Status",
    "Eligible",
    "Notes",
];

const STATUS_HEADER: [&str; 9] = [
    "Name",
    "Organization",
    "Amount",
    "Deadline",
    "Status",
    "Essays Completed",
    "Documents Submitted",
    "Days Until Deadline",
    "Eligible",
];

/// 逐行写出 CSV 文本
fn write_rows<I>(header: &[&str], rows: I) -> ExportResult<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(header)?;
    for row in rows {
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::CsvWriteError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ExportError::CsvWriteError(e.to_string()))
}

fn eligible_cell(item: &ExportedScholarship) -> String {
    item.is_eligible.map(yes_no).unwrap_or("").to_string()
}

// ==========================================
// 奖学金汇总 CSV
// ==========================================
pub struct ScholarshipCsvEncoder;

impl Encoder for ScholarshipCsvEncoder {
    fn render(&self, envelope: &ExportEnvelope) -> ExportResult<String> {
        let rows = envelope.scholarships.iter().map(|item| {
            let r = &item.record;
            vec![
                r.name.clone(),
                plain_amount(r.amount),
                r.deadline.format("%Y-%m-%d").to_string(),
                r.requirements.join("; "),
                r.organization.clone(),
                r.description.clone(),
                r.application_url.clone().unwrap_or_default(),
                status_label(r.status).to_string(),
                eligible_cell(item),
                r.notes.clone().unwrap_or_default(),
            ]
        });
        write_rows(&SUMMARY_HEADER, rows)
    }
}

// ==========================================
// 申请状态 CSV
// ==========================================
pub struct ApplicationStatusCsvEncoder;

impl Encoder for ApplicationStatusCsvEncoder {
    fn render(&self, envelope: &ExportEnvelope) -> ExportResult<String> {
        let export_day = envelope.export_day();
        let rows = envelope.scholarships.iter().map(|item| {
            let r = &item.record;
            let essays_done = r.essays.iter().filter(|e| e.completed).count();
            let docs_done = r.documents.iter().filter(|d| d.submitted).count();
            vec![
                r.name.clone(),
                r.organization.clone(),
                plain_amount(r.amount),
                r.deadline.format("%Y-%m-%d").to_string(),
                status_label(r.status).to_string(),
                format!("{}/{}", essays_done, r.essays.len()),
                format!("{}/{}", docs_done, r.documents.len()),
                (r.deadline - export_day).num_days().to_string(),
                eligible_cell(item),
            ]
        });
        write_rows(&STATUS_HEADER, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exporter::test_support::sample_envelope;

    #[test]
    fn test_summary_rows() {
        let csv = ScholarshipCsvEncoder.render(&sample_envelope()).unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Name,Amount,Deadline,Requirements,Organization,Description,Application URL,Status,Eligible,Notes"
        );
        let first = lines.next().unwrap();
        assert!(first.starts_with("Research Grant,1200,2025-05-01,transcript; essay,"));
    }

    #[test]
    fn test_summary_quoting() {
        let mut envelope = sample_envelope();
        envelope.scholarships[0].record.name = "Smith, Jones \"Best\" Award".to_string();
        envelope.scholarships[0].record.description = "line1\nline2".to_string();

        let csv = ScholarshipCsvEncoder.render(&envelope).unwrap();
        assert!(csv.contains("\"Smith, Jones \"\"Best\"\" Award\""));
        assert!(csv.contains("\"line1\nline2\""));
    }

    #[test]
    fn test_status_rows() {
        let csv = ApplicationStatusCsvEncoder.render(&sample_envelope()).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), STATUS_HEADER.len());

        let first = reader.records().next().unwrap().unwrap();
        assert_eq!(&first[0], "Research Grant");
        assert_eq!(&first[4], "submitted");
        assert_eq!(&first[5], "1/2");
        // 2025-01-10 → 2025-05-01
        assert_eq!(&first[7], "111");
    }
}
