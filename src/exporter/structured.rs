// ==========================================
// 奖学金数据交换引擎 - 结构化编码器（JSON）
// ==========================================
// 唯一保证可无损回读的格式
// ==========================================

use crate::domain::envelope::ExportEnvelope;
use crate::exporter::encoder::Encoder;
use crate::exporter::error::ExportResult;

pub struct StructuredEncoder;

impl Encoder for StructuredEncoder {
    fn render(&self, envelope: &ExportEnvelope) -> ExportResult<String> {
        Ok(serde_json::to_string_pretty(envelope)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exporter::test_support::sample_envelope;

    #[test]
    fn test_envelope_field_names() {
        let json = StructuredEncoder.render(&sample_envelope()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["exportType"], "full-backup");
        assert_eq!(value["exportVersion"], "1.0");
        assert!(value["exportDate"].as_str().unwrap().starts_with("2025-01-10T08:00:00"));
        assert!(value["scholarships"].is_array());
        assert_eq!(value["scholarships"][0]["deadline"], "2025-05-01");
        assert_eq!(value["scholarships"][0]["isEligible"], true);
        assert!(value["metadata"]["analytics"]["gapCoveragePercentage"].is_number());
    }

    #[test]
    fn test_envelope_deserializes_back() {
        let envelope = sample_envelope();
        let json = StructuredEncoder.render(&envelope).unwrap();
        let back: ExportEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back.scholarships.len(), envelope.scholarships.len());
        assert_eq!(back.scholarships[0].record, envelope.scholarships[0].record);
        assert_eq!(back.metadata.options, envelope.metadata.options);
    }
}
