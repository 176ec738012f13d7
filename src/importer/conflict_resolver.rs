// ==========================================
// 奖学金数据交换引擎 - 冲突合并器实现
// ==========================================
// 阶段 4: 按合并策略处理匹配对
// 策略: replace / merge / skip-duplicates（每次导入选定一次）
// 每个匹配对都产生一条 ConflictRecord
// ==========================================

use crate::domain::import::{ConflictRecord, ImportOptions};
use crate::domain::scholarship::ScholarshipRecord;
use crate::domain::types::{ConflictType, MergeStrategy, Resolution};
use crate::importer::importer_trait::ConflictResolver;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictResolverImpl;

impl ConflictResolverImpl {
    pub fn new() -> Self {
        Self
    }

    /// merge: 整体取导入值，仅 status 按 preserve_existing_progress 决定
    ///
    /// 与 replace 的唯一可观察差异在 status 字段
    fn merge(
        &self,
        existing: &ScholarshipRecord,
        incoming: &ScholarshipRecord,
        preserve_existing_progress: bool,
    ) -> ScholarshipRecord {
        let status = if preserve_existing_progress {
            existing.status
        } else {
            incoming.status
        };

        ScholarshipRecord {
            id: existing.id.clone(),
            status,
            ..incoming.clone()
        }
    }
}

impl ConflictResolver for ConflictResolverImpl {
    fn resolve(
        &self,
        existing: &ScholarshipRecord,
        incoming: &ScholarshipRecord,
        options: &ImportOptions,
    ) -> (ScholarshipRecord, ConflictRecord) {
        let (resolved, resolution) = if !options.auto_resolve_conflicts {
            // 人工队列：保留现有记录，等待外部处理
            (existing.clone(), Resolution::Manual)
        } else {
            match options.merge_strategy {
                MergeStrategy::Replace => (
                    ScholarshipRecord {
                        id: existing.id.clone(),
                        ..incoming.clone()
                    },
                    Resolution::Replace,
                ),
                MergeStrategy::Merge => (
                    self.merge(existing, incoming, options.preserve_existing_progress),
                    Resolution::Merge,
                ),
                MergeStrategy::SkipDuplicates => (existing.clone(), Resolution::Skip),
            }
        };

        debug!(
            scholarship = %existing.name,
            resolution = %resolution,
            "冲突已处理"
        );

        let conflict = ConflictRecord {
            conflict_type: ConflictType::DuplicateScholarship,
            scholarship_name: existing.name.clone(),
            existing: existing.clone(),
            incoming: incoming.clone(),
            resolution,
        };
        (resolved, conflict)
    }
}
