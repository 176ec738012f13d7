// ==========================================
// 奖学金数据交换引擎 - 富文本编码器（RTF）
// ==========================================
// 转义: \ { } 加反斜杠；换行 → \line；非 ASCII → \uN?（UTF-16 有符号码元）
// ==========================================

use crate::domain::envelope::ExportEnvelope;
use crate::exporter::encoder::Encoder;
use crate::exporter::error::ExportResult;
use crate::exporter::report::{Field, ReportView};

pub struct StyledDocumentEncoder;

/// RTF 文本转义
pub fn escape_rtf(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '\n' => out.push_str("\\line "),
            '\r' => {}
            c if c.is_ascii() => out.push(c),
            c => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{}?", *unit as i16));
                }
            }
        }
    }
    out
}

fn push_heading(out: &mut String, text: &str) {
    out.push_str(&format!("{{\\b\\fs28 {}}}\\par\n", escape_rtf(text)));
}

fn push_fields(out: &mut String, fields: &[Field], indent: bool) {
    for (label, value) in fields {
        if indent {
            out.push_str("\\li360 ");
        }
        out.push_str(&format!(
            "{{\\b {}:}} {}\\par\n",
            escape_rtf(label),
            escape_rtf(value)
        ));
        if indent {
            out.push_str("\\li0 ");
        }
    }
}

impl Encoder for StyledDocumentEncoder {
    fn render(&self, envelope: &ExportEnvelope) -> ExportResult<String> {
        let view = ReportView::from_envelope(envelope);
        let mut out = String::new();

        out.push_str("{\\rtf1\\ansi\\deff0\n{\\fonttbl{\\f0 Helvetica;}}\n\\f0\\fs22\n");
        out.push_str(&format!("{{\\b\\fs36 {}}}\\par\n", escape_rtf(&view.title)));
        push_fields(&mut out, &view.header, false);
        out.push_str("\\par\n");

        if !view.profile.is_empty() {
            push_heading(&mut out, "Student Profile");
            push_fields(&mut out, &view.profile, false);
            out.push_str("\\par\n");
        }

        push_heading(&mut out, "Summary");
        push_fields(&mut out, &view.summary, false);
        out.push_str("\\par\n");

        push_heading(&mut out, "Scholarships");
        for entry in &view.scholarships {
            out.push_str(&format!("{{\\b {}}}\\par\n", escape_rtf(&entry.title)));
            push_fields(&mut out, &entry.fields, true);
            out.push_str("\\par\n");
        }

        if let Some(goals) = &view.goals {
            push_heading(&mut out, "Financial Goals");
            for goal in goals {
                out.push_str(&format!("\\bullet  {}\\par\n", escape_rtf(goal)));
            }
        }

        out.push('}');
        Ok(out)
    }
}
