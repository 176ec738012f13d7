// ==========================================
// 奖学金数据交换引擎 - 导入管道 Trait
// ==========================================
// 职责: 定义导入各阶段接口（不包含实现）
// 流程: 解析 → 校验 → 去重 → 冲突合并 → 提交
// ==========================================

use crate::domain::import::{
    ConflictRecord, ImportOptions, ImportPayload, ParsedPayload, ValidationReport,
};
use crate::domain::scholarship::ScholarshipRecord;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::ColumnMapping;
use chrono::NaiveDate;

// ==========================================
// PayloadParser Trait
// ==========================================
// 用途: 载荷解析接口（阶段 1）
// 实现者: StructuredParser, DelimitedTextParser, SpreadsheetParser, UniversalPayloadParser
pub trait PayloadParser: Send + Sync {
    /// 解析载荷为候选记录
    ///
    /// # 参数
    /// - payload: 源数据（结构化 / CSV / xlsx）
    /// - mapping: 表格类输入的列映射（None = 位置默认）
    ///
    /// # 返回
    /// - Ok(ParsedPayload): 候选记录（未校验）
    /// - Err: 载荷无法解析、行列数不一致
    fn parse(
        &self,
        payload: &ImportPayload,
        mapping: Option<&ColumnMapping>,
    ) -> ImportResult<ParsedPayload>;
}

// ==========================================
// ImportValidator Trait
// ==========================================
// 用途: 结构与语义校验（阶段 2）
// 实现者: ImportValidatorImpl
pub trait ImportValidator: Send + Sync {
    /// 校验全部候选记录（收集全部问题，不短路）
    ///
    /// # 参数
    /// - parsed: 解析结果
    /// - today: 导入当日
    ///
    /// # 返回
    /// - ValidationReport: 硬错误 + 软警告
    fn validate(&self, parsed: &ParsedPayload, today: NaiveDate) -> ValidationReport;
}

// ==========================================
// DuplicateDetector Trait
// ==========================================
// 用途: 重复判定（阶段 3）
// 实现者: DuplicateDetectorImpl
pub trait DuplicateDetector: Send + Sync {
    /// 判定两条记录是否为同一奖学金（对称，与顺序无关）
    fn is_duplicate(&self, a: &ScholarshipRecord, b: &ScholarshipRecord) -> bool;

    /// 在现有集合中查找第一条匹配记录
    ///
    /// # 返回
    /// - Some(index): 按集合顺序的第一条匹配
    /// - None: 新记录
    fn find_match(
        &self,
        candidate: &ScholarshipRecord,
        existing: &[ScholarshipRecord],
    ) -> Option<usize> {
        existing.iter().position(|e| self.is_duplicate(e, candidate))
    }

    /// 为每条候选记录查找匹配
    fn detect(
        &self,
        candidates: &[ScholarshipRecord],
        existing: &[ScholarshipRecord],
    ) -> Vec<Option<usize>> {
        candidates
            .iter()
            .map(|c| self.find_match(c, existing))
            .collect()
    }

    /// 检测同一载荷内的重复
    ///
    /// # 返回
    /// - Vec<(首次出现下标, 重复下标)>
    fn detect_within(&self, candidates: &[ScholarshipRecord]) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for (later, candidate) in candidates.iter().enumerate() {
            if let Some(first) = candidates[..later]
                .iter()
                .position(|earlier| self.is_duplicate(earlier, candidate))
            {
                pairs.push((first, later));
            }
        }
        pairs
    }
}

// ==========================================
// ConflictResolver Trait
// ==========================================
// 用途: 按合并策略处理匹配对（阶段 4）
// 实现者: ConflictResolverImpl
pub trait ConflictResolver: Send + Sync {
    /// 处理一对匹配记录
    ///
    /// # 返回
    /// - (最终记录, 冲突记录)
    fn resolve(
        &self,
        existing: &ScholarshipRecord,
        incoming: &ScholarshipRecord,
        options: &ImportOptions,
    ) -> (ScholarshipRecord, ConflictRecord);
}
