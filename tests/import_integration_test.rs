// ==========================================
// 导入流程集成测试
// ==========================================
// 测试目标: 载荷 → 校验 → 去重 → 冲突合并 → 提交 的完整链路
// ==========================================


use scholarship_interchange::config::{config_keys, ConfigManager};
use scholarship_interchange::importer::{payload_from_file, ColumnMapping, ImportError};
use scholarship_interchange::{
    logging, ImportOptions, ImportOrchestrator, ImportPayload, ImportRequest, ImportStage,
    MergeStrategy, Resolution,
};
use std::collections::HashMap;
use std::io::Write;
use test_helpers::{date, envelope_json, goals, portfolio, scholarship, today};

#[test]
fn test_skip_duplicates_import_is_idempotent() {
    logging::init_test();

    let existing = portfolio();
    let payload = ImportPayload::Structured(envelope_json(
        "2025-01-09T12:00:00Z",
        r#"[
            {"name": "Merit Award", "amount": 5000, "deadline": "2025-03-01"},
            {"name": "New Horizons", "amount": 800, "deadline": "2025-04-01"}
        ]"#,
    ));
    let orchestrator = ImportOrchestrator::with_defaults();
    let options = ImportOptions::with_strategy(MergeStrategy::SkipDuplicates);

    let first = orchestrator.run(
        &ImportRequest::new(&payload, &existing)
            .with_options(options)
            .on(today()),
    );
    assert!(first.success);
    assert_eq!(first.summary.scholarships_imported, 1);
    assert_eq!(first.summary.duplicates_found, 1);
    assert_eq!(first.summary.conflicts_resolved, 0);
    assert_eq!(first.conflicts[0].resolution, Resolution::Skip);

    let after_first = first.records.unwrap().scholarships;
    assert_eq!(after_first.len(), 3);
    assert_eq!(after_first[0], existing[0]);

    // 再次导入同一载荷不应新增记录
    let second = orchestrator.run(
        &ImportRequest::new(&payload, &after_first)
            .with_options(options)
            .on(today()),
    );
    assert!(second.success);
    assert_eq!(second.summary.scholarships_imported, 0);
    assert_eq!(second.summary.duplicates_found, 2);
    assert_eq!(second.records.unwrap().scholarships, after_first);
}

#[test]
fn test_past_deadline_warns_but_imports() {
    let payload = ImportPayload::Structured(envelope_json(
        "2025-01-09T12:00:00Z",
        r#"[{"name": "Closed Fund", "amount": 400, "deadline": "2024-12-01"}]"#,
    ));
    let outcome = ImportOrchestrator::with_defaults()
        .run(&ImportRequest::new(&payload, &[]).on(today()));

    assert!(outcome.success);
    assert_eq!(outcome.final_stage, ImportStage::Committed);
    assert_eq!(outcome.summary.scholarships_imported, 1);
    assert_eq!(outcome.warnings().count(), 1);
    assert_eq!(outcome.errors.len(), 1);
}

#[test]
fn test_unparseable_deadline_rejects_whole_import() {
    let existing = vec![scholarship("s-1", "Keep Me", 100.0, date(2025, 5, 1))];
    let payload = ImportPayload::Structured(envelope_json(
        "2025-01-09T12:00:00Z",
        r#"[
            {"name": "Good", "amount": 100, "deadline": "2025-05-01"},
            {"name": "Bad", "amount": 100, "deadline": "someday"}
        ]"#,
    ));
    let outcome = ImportOrchestrator::with_defaults()
        .run(&ImportRequest::new(&payload, &existing).on(today()));

    assert!(!outcome.success);
    assert_eq!(outcome.final_stage, ImportStage::Rejected);
    assert_eq!(outcome.stages, vec![ImportStage::Parsed, ImportStage::Rejected]);
    assert!(outcome.records.is_none());
    assert_eq!(outcome.summary.scholarships_imported, 0);
    assert!(outcome.issues.iter().any(|i| i.row_number == 2 && i.is_error()));
}

#[test]
fn test_malformed_payload_is_parse_error() {
    let payload = ImportPayload::Structured("{not json".to_string());
    let outcome = ImportOrchestrator::with_defaults().run(&ImportRequest::new(&payload, &[]));

    assert!(!outcome.success);
    assert_eq!(outcome.stages, vec![ImportStage::Rejected]);
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].starts_with("解析失败"));
}

#[test]
fn test_merge_preserves_existing_progress() {
    let existing = portfolio();
    let payload = ImportPayload::Structured(envelope_json(
        "2025-01-09T12:00:00Z",
        r#"[{"title": "Merit  award", "amount": "$5,050", "deadline": "2025-03-01", "status": "submitted", "description": "Updated"}]"#,
    ));
    let options = ImportOptions {
        merge_strategy: MergeStrategy::Merge,
        auto_resolve_conflicts: true,
        preserve_existing_progress: true,
    };
    let outcome = ImportOrchestrator::with_defaults().run(
        &ImportRequest::new(&payload, &existing)
            .with_options(options)
            .on(today()),
    );

    assert!(outcome.success);
    assert_eq!(outcome.summary.conflicts_resolved, 1);
    let merged = &outcome.records.unwrap().scholarships[0];
    assert_eq!(merged.id, "s-merit");
    assert_eq!(merged.amount, 5050.0);
    assert_eq!(merged.description, "Updated");
    assert_eq!(merged.status, existing[0].status);
    // 除状态外均取导入值
    assert!(merged.essays.is_empty());
    assert_eq!(merged.organization, "");
    assert_eq!(merged.notes, None);
}

#[test]
fn test_bare_array_payload_needs_export_date() {
    let payload = ImportPayload::Structured(
        r#"[{"name": "Loose Record", "amount": 100, "deadline": "2025-05-01"}]"#.to_string(),
    );
    let outcome = ImportOrchestrator::with_defaults()
        .run(&ImportRequest::new(&payload, &[]).on(today()));

    assert!(!outcome.success);
    assert_eq!(outcome.final_stage, ImportStage::Rejected);
    assert!(outcome.records.is_none());
    assert!(outcome
        .issues
        .iter()
        .any(|i| i.is_error() && i.row_number == 0 && i.field == "exportDate"));
}

#[test]
fn test_structured_text_fields_are_trimmed() {
    let payload = ImportPayload::Structured(envelope_json(
        "2025-01-09T12:00:00Z",
        r#"[{"name": "  Padded Grant ", "amount": 100, "deadline": "2025-05-01", "notes": "   ", "requirements": [" essay "]}]"#,
    ));
    let outcome = ImportOrchestrator::with_defaults()
        .run(&ImportRequest::new(&payload, &[]).on(today()));

    assert!(outcome.success, "{:?}", outcome.errors);
    let record = &outcome.records.unwrap().scholarships[0];
    assert_eq!(record.name, "Padded Grant");
    assert_eq!(record.notes, None);
    assert_eq!(record.requirements, vec!["essay"]);
}

#[test]
fn test_csv_file_with_explicit_mapping() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "Due,Award Title,Prize").unwrap();
    writeln!(file, "2025-05-01,Lakeside Grant,\"$1,500\"").unwrap();
    writeln!(file, ",,").unwrap();
    writeln!(file, "45809,Harbor Prize,700").unwrap();

    let payload = payload_from_file(file.path()).unwrap();
    let mapping = ColumnMapping::explicit(
        HashMap::from([
            ("deadline".to_string(), 0),
            ("name".to_string(), 1),
            ("amount".to_string(), 2),
        ]),
        true,
    );
    let outcome = ImportOrchestrator::with_defaults().run(
        &ImportRequest::new(&payload, &[])
            .with_mapping(&mapping)
            .on(today()),
    );

    assert!(outcome.success, "{:?}", outcome.errors);
    let records = outcome.records.unwrap().scholarships;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].name, "Lakeside Grant");
    assert_eq!(records[0].amount, 1500.0);
    assert_eq!(records[1].deadline, date(2025, 6, 1));
}

#[test]
fn test_unsupported_file_extension() {
    let file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    assert!(matches!(
        payload_from_file(file.path()),
        Err(ImportError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_config_tolerance_changes_duplicate_detection() {
    let existing = vec![scholarship("s-1", "City Grant", 1000.0, date(2025, 5, 1))];
    let payload = ImportPayload::Structured(envelope_json(
        "2025-01-09T12:00:00Z",
        r#"[{"name": "City Grant", "amount": 1150, "deadline": "2025-06-01"}]"#,
    ));

    let strict = ImportOrchestrator::with_defaults()
        .run(&ImportRequest::new(&payload, &existing).on(today()));
    assert_eq!(strict.summary.duplicates_found, 0);
    assert_eq!(strict.summary.scholarships_imported, 1);

    let mut config = ConfigManager::new();
    config.set_config_value(config_keys::DUPLICATE_AMOUNT_TOLERANCE, "200");
    let loose = ImportOrchestrator::from_config(&config)
        .run(&ImportRequest::new(&payload, &existing).on(today()));
    assert_eq!(loose.summary.duplicates_found, 1);
}

#[test]
fn test_goals_imported_once() {
    let existing_goals = goals();
    let payload = ImportPayload::Structured(
        r#"{
            "exportDate": "2025-01-09T12:00:00Z",
            "scholarships": [],
            "financialGoals": [
                {"title": "tuition", "targetAmount": 20000, "currentAmount": 0, "deadline": "2025-08-01"},
                {"title": "Laptop", "targetAmount": 1500, "currentAmount": 300, "deadline": "2025-09-01"}
            ]
        }"#
        .to_string(),
    );
    let outcome = ImportOrchestrator::with_defaults().run(
        &ImportRequest::new(&payload, &[])
            .with_goals(&existing_goals)
            .on(today()),
    );

    assert!(outcome.success);
    assert_eq!(outcome.summary.goals_imported, 1);
    let goals = outcome.records.unwrap().goals;
    assert_eq!(goals.len(), 2);
    assert_eq!(goals[1].title, "Laptop");
}
