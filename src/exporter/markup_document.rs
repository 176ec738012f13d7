// ==========================================
// 奖学金数据交换引擎 - HTML 报告编码器
// ==========================================

use crate::domain::envelope::ExportEnvelope;
use crate::exporter::encoder::Encoder;
use crate::exporter::error::ExportResult;
use crate::exporter::report::{Field, ReportView};

pub struct MarkupDocumentEncoder;

const STYLE: &str = "body{font-family:Helvetica,Arial,sans-serif;margin:2em;color:#222}\
h1{border-bottom:2px solid #2b6cb0}\
dl{display:grid;grid-template-columns:max-content auto;gap:.25em 1em}\
dt{font-weight:bold}\
.scholarship{border:1px solid #ddd;border-radius:6px;padding:.5em 1em;margin:.75em 0}";

/// HTML 文本转义
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\n' => out.push_str("<br>"),
            c => out.push(c),
        }
    }
    out
}

fn definition_list(fields: &[Field]) -> String {
    let mut out = String::from("<dl>\n");
    for (label, value) in fields {
        out.push_str(&format!(
            "<dt>{}</dt><dd>{}</dd>\n",
            escape_html(label),
            escape_html(value)
        ));
    }
    out.push_str("</dl>\n");
    out
}

impl Encoder for MarkupDocumentEncoder {
    fn render(&self, envelope: &ExportEnvelope) -> ExportResult<String> {
        let view = ReportView::from_envelope(envelope);
        let title = escape_html(&view.title);

        let mut body = format!("<h1>{}</h1>\n", title);
        body.push_str(&definition_list(&view.header));

        if !view.profile.is_empty() {
            body.push_str("<h2>Student Profile</h2>\n");
            body.push_str(&definition_list(&view.profile));
        }

        body.push_str("<h2>Summary</h2>\n");
        body.push_str(&definition_list(&view.summary));

        body.push_str("<h2>Scholarships</h2>\n");
        for entry in &view.scholarships {
            body.push_str("<section class=\"scholarship\">\n");
            body.push_str(&format!("<h3>{}</h3>\n", escape_html(&entry.title)));
            body.push_str(&definition_list(&entry.fields));
            body.push_str("</section>\n");
        }

        if let Some(goals) = &view.goals {
            body.push_str("<h2>Financial Goals</h2>\n<ul>\n");
            for goal in goals {
                body.push_str(&format!("<li>{}</li>\n", escape_html(goal)));
            }
            body.push_str("</ul>\n");
        }

        Ok(format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
            title, STYLE, body
        ))
    }
}
