// ==========================================
// 奖学金数据交换引擎 - 报告视图
// ==========================================
// 职责: 信封 → 带标签的文本块（纯文本 / RTF / HTML 共用）
// 各文档编码器只负责样式，内容一致
// ==========================================

use crate::domain::envelope::{ExportEnvelope, GoalProjection, ProfileProjection};
use crate::exporter::encoder::{format_currency, yes_no};

/// 标签 + 值
pub type Field = (String, String);

pub struct ScholarshipEntry {
    pub title: String,
    pub fields: Vec<Field>,
}

pub struct ReportView {
    pub title: String,
    pub header: Vec<Field>,
    pub profile: Vec<Field>,
    pub summary: Vec<Field>,
    pub scholarships: Vec<ScholarshipEntry>,
    pub goals: Option<Vec<String>>,
}

fn field(label: &str, value: impl Into<String>) -> Field {
    (label.to_string(), value.into())
}

impl ReportView {
    pub fn from_envelope(envelope: &ExportEnvelope) -> Self {
        let options = envelope.options();
        let analytics = &envelope.metadata.analytics;

        let header = vec![
            field("Export type", envelope.export_type.as_label()),
            field(
                "Exported",
                envelope.export_date.format("%Y-%m-%d %H:%M UTC").to_string(),
            ),
            field("Exported by", envelope.exported_by.clone()),
            field("Version", envelope.export_version.clone()),
        ];

        let profile = match &envelope.student_profile {
            None => Vec::new(),
            Some(ProfileProjection::Anonymized(p)) => vec![
                field("GPA range", p.gpa_range.clone()),
                field("Major category", p.major_category.clone()),
                field("Class standing", p.class_standing.clone()),
            ],
            Some(ProfileProjection::Full(p)) => {
                let mut fields = vec![field("Name", p.name.clone())];
                if let Some(email) = &p.email {
                    fields.push(field("Email", email.clone()));
                }
                if let Some(school) = &p.school {
                    fields.push(field("School", school.clone()));
                }
                if let Some(major) = &p.major {
                    fields.push(field("Major", major.clone()));
                }
                if let Some(gpa) = p.gpa {
                    fields.push(field("GPA", format!("{:.2}", gpa)));
                }
                if let Some(year) = p.graduation_year {
                    fields.push(field("Graduation year", year.to_string()));
                }
                fields
            }
        };

        let mut summary = vec![field(
            "Total scholarships",
            envelope.metadata.total_scholarships.to_string(),
        )];
        if options.include_application_progress {
            summary.push(field(
                "Awarded",
                format!(
                    "{} ({})",
                    analytics.awarded_count,
                    format_currency(analytics.total_awarded)
                ),
            ));
            summary.push(field(
                "Pending applications",
                format!(
                    "{} ({})",
                    analytics.applied_count,
                    format_currency(analytics.total_applied)
                ),
            ));
            summary.push(field(
                "Success rate",
                format!("{:.1}%", analytics.application_success_rate),
            ));
        }
        if options.include_financial_info && !options.anonymize_data {
            summary.push(field("Total need", format_currency(analytics.total_need)));
            summary.push(field("Funding gap", format_currency(analytics.funding_gap)));
            summary.push(field(
                "Gap coverage",
                format!("{:.1}%", analytics.gap_coverage_percentage),
            ));
        }

        let scholarships = envelope
            .scholarships
            .iter()
            .map(|item| {
                let r = &item.record;
                let mut fields = Vec::new();
                if !r.organization.is_empty() {
                    fields.push(field("Organization", r.organization.clone()));
                }
                fields.push(field("Amount", format_currency(r.amount)));
                fields.push(field("Deadline", r.deadline.format("%Y-%m-%d").to_string()));
                if let Some(status) = r.status {
                    fields.push(field("Status", status.as_label()));
                }
                if let Some(eligible) = item.is_eligible {
                    fields.push(field("Eligible", yes_no(eligible)));
                }
                if !r.requirements.is_empty() {
                    fields.push(field("Requirements", r.requirements.join(", ")));
                }
                if !r.description.is_empty() {
                    fields.push(field("Description", r.description.clone()));
                }
                if let Some(url) = &r.application_url {
                    fields.push(field("Application URL", url.clone()));
                }
                if !r.essays.is_empty() {
                    let done = r.essays.iter().filter(|e| e.completed).count();
                    fields.push(field(
                        "Essays",
                        format!("{}/{} completed", done, r.essays.len()),
                    ));
                    for essay in &r.essays {
                        fields.push(field(
                            "Essay",
                            format!("{} ({} words)", essay.prompt, essay.word_count()),
                        ));
                    }
                }
                if !r.documents.is_empty() {
                    let done = r.documents.iter().filter(|d| d.submitted).count();
                    fields.push(field(
                        "Documents",
                        format!("{}/{} submitted", done, r.documents.len()),
                    ));
                }
                if let Some(notes) = &r.notes {
                    fields.push(field("Notes", notes.clone()));
                }
                ScholarshipEntry {
                    title: r.name.clone(),
                    fields,
                }
            })
            .collect();

        let goals = envelope.financial_goals.as_ref().map(|goals| {
            goals
                .iter()
                .map(|goal| match goal {
                    GoalProjection::Full(g) => format!(
                        "{}: {} of {} by {}",
                        g.title,
                        format_currency(g.current_amount),
                        format_currency(g.target_amount),
                        g.deadline.format("%Y-%m-%d")
                    ),
                    GoalProjection::Anonymized(g) => format!(
                        "{}: {} by {}",
                        g.title,
                        g.goal_size.as_label(),
                        g.deadline.format("%Y-%m-%d")
                    ),
                })
                .collect()
        });

        Self {
            title: "Scholarship Export Report".to_string(),
            header,
            profile,
            summary,
            scholarships,
            goals,
        }
    }
}
