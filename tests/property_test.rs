// ==========================================
// 性质测试
// ==========================================
// 工具: proptest
// 覆盖: 去重对称性、往返一致性、资金覆盖率上下限、替换与合并的差异
// ==========================================


use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use scholarship_interchange::domain::FinancialGoalRecord;
use scholarship_interchange::importer::{DuplicateDetector, DuplicateDetectorImpl};
use scholarship_interchange::{
    AnalyticsAggregator, ApplicationStatus, ExportFormat, ExportRequest, ExportSerializer,
    ExportType, ImportOptions, ImportOrchestrator, ImportPayload, ImportRequest, MergeStrategy,
    ScholarshipRecord,
};
use test_helpers::{date, envelope_json, export_time, scholarship, today};

fn arb_status() -> impl Strategy<Value = Option<ApplicationStatus>> {
    prop_oneof![
        Just(None),
        Just(Some(ApplicationStatus::Draft)),
        Just(Some(ApplicationStatus::InProgress)),
        Just(Some(ApplicationStatus::Submitted)),
        Just(Some(ApplicationStatus::Awarded)),
        Just(Some(ApplicationStatus::Received)),
    ]
}

fn arb_deadline() -> impl Strategy<Value = NaiveDate> {
    (0i64..365).prop_map(|offset| today() + Duration::days(offset))
}

prop_compose! {
    fn arb_record()(
        name in "[A-Z][a-z]{2,8}( [A-Z][a-z]{2,8}){0,2}",
        amount in 1u32..50_000,
        deadline in arb_deadline(),
        status in arb_status(),
    ) -> ScholarshipRecord {
        let mut record = scholarship("", &name, amount as f64, deadline);
        record.status = status;
        record
    }
}

prop_compose! {
    fn arb_goal()(
        target in 0u32..100_000,
        current in 0u32..100_000,
        deadline in arb_deadline(),
    ) -> FinancialGoalRecord {
        FinancialGoalRecord {
            id: String::new(),
            title: "Goal".to_string(),
            target_amount: target as f64,
            current_amount: current as f64,
            deadline,
            calculation_method: "manual".to_string(),
        }
    }
}

prop_compose! {
    /// 同名同额同截止日，其余字段任意
    fn arb_same_listing(id: &'static str)(
        organization in "[A-Za-z]{0,6}",
        notes in proptest::option::of("[a-z]{1,6}"),
        status in arb_status(),
    ) -> ScholarshipRecord {
        let mut record = scholarship(id, "Harbor Grant", 1000.0, date(2025, 5, 1));
        record.organization = organization;
        record.notes = notes;
        record.status = status;
        record
    }
}

fn resolve_with(
    strategy: MergeStrategy,
    payload: &ImportPayload,
    existing: &[ScholarshipRecord],
) -> ScholarshipRecord {
    let options = ImportOptions {
        merge_strategy: strategy,
        auto_resolve_conflicts: true,
        preserve_existing_progress: true,
    };
    let outcome = ImportOrchestrator::with_defaults().run(
        &ImportRequest::new(payload, existing)
            .with_options(options)
            .on(today()),
    );
    assert!(outcome.success, "{:?}", outcome.errors);
    outcome.records.unwrap().scholarships.remove(0)
}

proptest! {
    #[test]
    fn prop_merge_differs_from_replace_only_in_status(
        existing in arb_same_listing("s-1"),
        incoming in arb_same_listing("s-incoming"),
    ) {
        let rows = serde_json::to_string(&vec![incoming.clone()]).unwrap();
        let payload = ImportPayload::Structured(envelope_json("2025-01-09T12:00:00Z", &rows));
        let existing = vec![existing];

        let mut replaced = resolve_with(MergeStrategy::Replace, &payload, &existing);
        let mut merged = resolve_with(MergeStrategy::Merge, &payload, &existing);

        prop_assert_eq!(replaced.status, incoming.status);
        prop_assert_eq!(merged.status, existing[0].status);
        prop_assert_eq!(merged.id.as_str(), "s-1");
        if existing[0].status == incoming.status {
            prop_assert_eq!(&merged, &replaced);
        }

        replaced.status = None;
        merged.status = None;
        prop_assert_eq!(merged, replaced);
    }

    #[test]
    fn prop_duplicate_detection_is_symmetric(a in arb_record(), b in arb_record()) {
        let detector = DuplicateDetectorImpl::default();
        prop_assert_eq!(detector.is_duplicate(&a, &b), detector.is_duplicate(&b, &a));
        prop_assert!(detector.is_duplicate(&a, &a));
    }

    #[test]
    fn prop_json_export_roundtrips_through_import(
        records in prop::collection::vec(arb_record(), 0..6)
    ) {
        let records: Vec<ScholarshipRecord> = records
            .into_iter()
            .enumerate()
            .map(|(i, mut r)| {
                r.id = format!("s-{}", i);
                r
            })
            .collect();
        let request = ExportRequest::new(&records, ExportType::FullBackup).at(export_time());
        let exported = ExportSerializer::with_defaults()
            .export(&request, ExportFormat::Json)
            .unwrap();

        let payload = ImportPayload::Structured(exported.content);
        let outcome = ImportOrchestrator::with_defaults()
            .run(&ImportRequest::new(&payload, &[]).on(today()));

        prop_assert!(outcome.success);
        let committed = outcome.records.unwrap().scholarships;
        // 载荷内的重复仅警告，仍逐条导入
        prop_assert_eq!(committed, records);
    }

    #[test]
    fn prop_gap_coverage_is_bounded(
        records in prop::collection::vec(arb_record(), 0..8),
        goals in prop::collection::vec(arb_goal(), 0..4),
    ) {
        let analytics = AnalyticsAggregator::new().aggregate(&records, &goals);
        prop_assert!(analytics.gap_coverage_percentage >= 0.0);
        prop_assert!(analytics.gap_coverage_percentage <= 100.0);
        prop_assert!(analytics.funding_gap >= 0.0);
        if analytics.funding_gap == 0.0 {
            prop_assert_eq!(analytics.gap_coverage_percentage, 100.0);
        }
        prop_assert_eq!(
            analytics.active_applications,
            analytics.awarded_count + analytics.applied_count
        );
    }
}
