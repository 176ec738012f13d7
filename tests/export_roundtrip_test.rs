// ==========================================
// 导出 → 导入 往返集成测试
// ==========================================
// 测试目标: 导出的文本可被导入流程还原
// ==========================================


use scholarship_interchange::domain::{ExportOptions, ProfileProjection};
use scholarship_interchange::exporter::ANONYMOUS_EXPORTER;
use scholarship_interchange::{
    ColumnMapping, ExportFormat, ExportRequest, ExportSerializer, ExportSource, ExportType,
    ImportOptions, ImportOrchestrator, ImportPayload, ImportRequest, MergeStrategy,
};
use std::io::Write;
use test_helpers::{export_time, goals, portfolio, profile, today};

#[test]
fn test_full_backup_json_roundtrip() {
    let records = portfolio();
    let goals = goals();
    let profile = profile();
    let request = ExportRequest::new(&records, ExportType::FullBackup)
        .with_goals(&goals)
        .with_profile(&profile)
        .at(export_time());

    let exported = ExportSerializer::with_defaults()
        .export(&request, ExportFormat::Json)
        .unwrap();
    assert_eq!(exported.filename, "scholarship-full-backup-2025-01-10.json");

    let payload = ImportPayload::Structured(exported.content);
    let outcome = ImportOrchestrator::with_defaults()
        .run(&ImportRequest::new(&payload, &[]).on(today()));

    assert!(outcome.success, "{:?}", outcome.errors);
    assert!(outcome.errors.is_empty());
    let committed = outcome.records.unwrap();
    assert_eq!(committed.scholarships, records);
    assert_eq!(committed.goals.len(), 1);
    assert_eq!(committed.goals[0].title, "Tuition");
    assert_eq!(committed.goals[0].target_amount, 20_000.0);
    assert_eq!(committed.goals[0].current_amount, 4_000.0);
}

#[test]
fn test_reimporting_own_backup_finds_every_duplicate() {
    let records = portfolio();
    let request = ExportRequest::new(&records, ExportType::FullBackup).at(export_time());
    let exported = ExportSerializer::with_defaults()
        .export(&request, ExportFormat::Json)
        .unwrap();

    let payload = ImportPayload::Structured(exported.content);
    let outcome = ImportOrchestrator::with_defaults().run(
        &ImportRequest::new(&payload, &records)
            .with_options(ImportOptions::with_strategy(MergeStrategy::SkipDuplicates))
            .on(today()),
    );

    assert!(outcome.success);
    assert_eq!(outcome.summary.duplicates_found, records.len());
    assert_eq!(outcome.summary.conflicts_resolved, 0);
    assert_eq!(outcome.summary.scholarships_imported, 0);
    assert_eq!(outcome.records.unwrap().scholarships, records);
}

#[test]
fn test_summary_csv_reimports_with_header() {
    let records = portfolio();
    let request = ExportRequest::new(&records, ExportType::FullBackup).at(export_time());
    let exported = ExportSerializer::with_defaults()
        .export(&request, ExportFormat::Csv)
        .unwrap();
    assert!(exported.content.starts_with("Name,Amount,Deadline"));

    let payload = ImportPayload::DelimitedText(exported.content);
    let mapping = ColumnMapping::with_header();
    let outcome = ImportOrchestrator::with_defaults().run(
        &ImportRequest::new(&payload, &[])
            .with_mapping(&mapping)
            .on(today()),
    );

    assert!(outcome.success, "{:?}", outcome.errors);
    let imported = outcome.records.unwrap().scholarships;
    assert_eq!(imported.len(), records.len());
    for (got, want) in imported.iter().zip(&records) {
        assert_eq!(got.name, want.name);
        assert_eq!(got.amount, want.amount);
        assert_eq!(got.deadline, want.deadline);
        assert_eq!(got.requirements, want.requirements);
        assert_eq!(got.organization, want.organization);
        assert_eq!(got.status, want.status);
        assert_eq!(got.application_url, want.application_url);
    }
}

#[test]
fn test_anonymized_portfolio_hides_personal_data() {
    let records = portfolio();
    let goals = goals();
    let profile = profile();
    let options = ExportOptions {
        anonymize_data: true,
        ..ExportOptions::all()
    };
    let request = ExportRequest::new(&records, ExportType::Portfolio)
        .with_goals(&goals)
        .with_profile(&profile)
        .with_options(options)
        .at(export_time());

    let exported = ExportSerializer::with_defaults()
        .export(&request, ExportFormat::Json)
        .unwrap();
    let envelope = &exported.envelope;

    assert_eq!(envelope.exported_by, ANONYMOUS_EXPORTER);
    assert!(envelope
        .scholarships
        .iter()
        .all(|s| !s.record.has_personal_responses()));
    match &envelope.student_profile {
        Some(ProfileProjection::Anonymized(p)) => {
            assert_eq!(p.gpa_range, "3.5-4.0");
            assert_eq!(p.major_category, "STEM");
        }
        other => panic!("unexpected profile projection: {:?}", other),
    }
    assert!(!exported.content.contains("jamie@example.com"));
    assert!(!exported.content.contains("Call the office"));
    assert!(!exported.content.contains("\"targetAmount\""));
    // 目标金额不得以任何字段形式出现
    assert!(!exported.content.contains("20000"));
    assert!(!exported.content.contains("4000"));
    assert_eq!(envelope.metadata.analytics.total_need, 0.0);
    assert_eq!(envelope.metadata.analytics.current_savings, 0.0);
}

#[test]
fn test_template_export_drops_progress() {
    let records = portfolio();
    let goals = goals();
    let request = ExportRequest::new(&records, ExportType::Template)
        .with_goals(&goals)
        .at(export_time());
    let exported = ExportSerializer::with_defaults()
        .export(&request, ExportFormat::Json)
        .unwrap();

    let envelope = &exported.envelope;
    assert!(envelope.scholarships.iter().all(|s| s.record.status.is_none()));
    assert!(envelope.student_profile.is_none());
    assert!(envelope.financial_goals.is_none());
    assert!(envelope.metadata.status_counts.is_empty());
    // 分析基于完整输入
    assert_eq!(envelope.metadata.analytics.awarded_count, 1);
}

#[test]
fn test_every_format_renders_from_loaded_source() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"{{
            "scholarships": [
                {{"title": "Merit Award", "provider": "Rotary", "value": "5,000", "dueDate": "2025-03-01", "applicationStatus": "won"}},
                {{"name": "Quick Grant", "amount": 250, "deadline": "2025-02-01", "requirements": "essay; resume"}}
            ],
            "financialGoals": [{{"title": "Books", "targetAmount": 800, "currentAmount": 200, "deadline": "2025-09-01"}}]
        }}"#
    )
    .unwrap();

    let source = ExportSource::load(file.path()).unwrap();
    assert_eq!(source.scholarships.len(), 2);
    assert_eq!(source.scholarships[1].requirements, vec!["essay", "resume"]);

    let request = ExportRequest::new(&source.scholarships, ExportType::FullBackup)
        .with_goals(&source.goals)
        .at(export_time());
    let serializer = ExportSerializer::with_defaults();

    for format in ExportFormat::ALL {
        let payload = serializer.export(&request, format).unwrap();
        assert!(
            payload.content.contains("Merit Award"),
            "{} output misses record",
            format
        );
        assert!(payload.filename.ends_with(format.extension()));
    }
}
