// ==========================================
// 奖学金数据交换引擎 - 载荷解析器实现
// ==========================================
// 阶段 1: 载荷 → 候选记录
// 支持: JSON 导出信封 / CSV 文本 / Excel (.xlsx) 字节
// ==========================================

use crate::domain::import::{CandidateRecord, EnvelopeHeader, ImportPayload, ParsedPayload};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_normalizer::{canonical_field_for_header, CanonicalField, FieldNormalizer};
use crate::importer::importer_trait::PayloadParser;
use calamine::{Reader, Xlsx};
use csv::ReaderBuilder;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// 无表头、无显式映射时的默认列顺序（与 CSV 导出列顺序一致）
pub const DEFAULT_COLUMN_ORDER: [CanonicalField; 8] = [
    CanonicalField::Name,
    CanonicalField::Amount,
    CanonicalField::Deadline,
    CanonicalField::Requirements,
    CanonicalField::Organization,
    CanonicalField::Description,
    CanonicalField::ApplicationUrl,
    CanonicalField::Status,
];

// ==========================================
// ColumnMapping - 表格列映射
// ==========================================
// 优先级: 显式映射 > 表头推断 > 位置默认
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    pub has_header: bool,                          // 第一行是否为表头
    pub columns: Option<HashMap<String, usize>>, // 字段名(可用别名) → 列下标
}

impl ColumnMapping {
    pub fn positional() -> Self {
        Self::default()
    }

    pub fn with_header() -> Self {
        Self {
            has_header: true,
            columns: None,
        }
    }

    pub fn explicit(columns: HashMap<String, usize>, has_header: bool) -> Self {
        Self {
            has_header,
            columns: Some(columns),
        }
    }

    /// 由表头推断映射（同一字段取第一次出现的列）
    pub fn from_header(header: &[String]) -> HashMap<CanonicalField, usize> {
        let mut index = HashMap::new();
        for (i, name) in header.iter().enumerate() {
            if let Some(field) = canonical_field_for_header(name) {
                index.entry(field).or_insert(i);
            }
        }
        index
    }

    fn positional_index() -> HashMap<CanonicalField, usize> {
        DEFAULT_COLUMN_ORDER
            .iter()
            .enumerate()
            .map(|(i, f)| (*f, i))
            .collect()
    }

    /// 计算最终列映射
    ///
    /// # 参数
    /// - header: 表头行（has_header 为 true 时提供）
    /// - width: 行宽度，用于校验显式下标
    pub fn resolve(
        &self,
        header: Option<&[String]>,
        width: Option<usize>,
    ) -> ImportResult<HashMap<CanonicalField, usize>> {
        if let Some(columns) = &self.columns {
            let mut index = HashMap::new();
            for (name, col) in columns {
                let field = canonical_field_for_header(name).ok_or_else(|| {
                    ImportError::ColumnMappingError(format!("未知字段: {}", name))
                })?;
                if let Some(width) = width {
                    if *col >= width {
                        return Err(ImportError::ColumnMappingError(format!(
                            "字段 {} 的列下标 {} 超出范围（共 {} 列）",
                            name, col, width
                        )));
                    }
                }
                if index.insert(field, *col).is_some() {
                    return Err(ImportError::ColumnMappingError(format!(
                        "字段 {} 被重复映射",
                        field.key()
                    )));
                }
            }
            return Ok(index);
        }

        if let Some(header) = header {
            let inferred = Self::from_header(header);
            if !inferred.is_empty() {
                return Ok(inferred);
            }
            debug!("表头无可识别字段，回退为位置映射");
        }

        Ok(Self::positional_index())
    }
}

// ==========================================
// 表格行 → 候选记录（CSV 与 Excel 共用）
// ==========================================
struct SheetRow {
    line: usize, // 源文件行号（从 1 开始）
    cells: Vec<String>,
}

fn map_rows(rows: Vec<SheetRow>, mapping: Option<&ColumnMapping>) -> ImportResult<Vec<CandidateRecord>> {
    let positional = ColumnMapping::positional();
    let mapping = mapping.unwrap_or(&positional);

    let mut rows = rows.into_iter().peekable();
    let header = if mapping.has_header {
        rows.next().map(|r| r.cells)
    } else {
        None
    };
    let width = header
        .as_ref()
        .map(|h| h.len())
        .or_else(|| rows.peek().map(|r| r.cells.len()));
    let index = mapping.resolve(header.as_deref(), width)?;

    let normalizer = FieldNormalizer::new();
    let mut candidates = Vec::new();
    for row in rows {
        // 跳过完全空白的行
        if row.cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let mut fields: HashMap<String, String> = HashMap::new();
        for (field, col) in &index {
            if let Some(value) = row.cells.get(*col) {
                fields.insert(field.key().to_string(), value.clone());
            }
        }
        candidates.push(normalizer.to_candidate(&fields, row.line));
    }

    Ok(candidates)
}

// ==========================================
// Structured Parser 实现（JSON 导出信封）
// ==========================================
pub struct StructuredParser;

impl StructuredParser {
    fn parse_text(&self, text: &str) -> ImportResult<ParsedPayload> {
        let root: Value = serde_json::from_str(text)?;
        let normalizer = FieldNormalizer::new();

        match root {
            // 裸数组：视为缺少信封字段的奖学金列表，交由校验器报告 exportDate 缺失
            Value::Array(items) => Ok(ParsedPayload {
                header: Some(EnvelopeHeader {
                    scholarships_is_list: true,
                    ..EnvelopeHeader::default()
                }),
                candidates: Self::candidates(&normalizer, &items),
                goals: Vec::new(),
            }),
            Value::Object(map) => {
                let text_of = |key: &str| map.get(key).and_then(|v| v.as_str()).map(str::to_string);
                let scholarships = map.get("scholarships").and_then(|v| v.as_array());

                let header = EnvelopeHeader {
                    export_type: text_of("exportType"),
                    export_date_raw: text_of("exportDate"),
                    export_version: text_of("exportVersion"),
                    exported_by: text_of("exportedBy"),
                    scholarships_is_list: scholarships.is_some(),
                };

                let candidates = scholarships
                    .map(|items| Self::candidates(&normalizer, items))
                    .unwrap_or_default();

                let goals = map
                    .get("financialGoals")
                    .and_then(|v| v.as_array())
                    .map(|items| {
                        items
                            .iter()
                            .enumerate()
                            .filter_map(|(i, item)| {
                                item.as_object()
                                    .map(|obj| normalizer.to_goal_candidate(obj, i + 1))
                            })
                            .collect()
                    })
                    .unwrap_or_default();

                Ok(ParsedPayload {
                    header: Some(header),
                    candidates,
                    goals,
                })
            }
            _ => Err(ImportError::MalformedPayload(
                "顶层必须为对象或数组".to_string(),
            )),
        }
    }

    fn candidates(normalizer: &FieldNormalizer, items: &[Value]) -> Vec<CandidateRecord> {
        items
            .iter()
            .enumerate()
            .map(|(i, item)| match item.as_object() {
                Some(obj) => normalizer.to_candidate(obj, i + 1),
                // 非对象元素交由校验器报告缺失字段
                None => CandidateRecord::empty(i + 1),
            })
            .collect()
    }
}

impl PayloadParser for StructuredParser {
    fn parse(
        &self,
        payload: &ImportPayload,
        _mapping: Option<&ColumnMapping>,
    ) -> ImportResult<ParsedPayload> {
        match payload {
            ImportPayload::Structured(text) => self.parse_text(text),
            other => Err(ImportError::UnsupportedFormat(other.source_kind().to_string())),
        }
    }
}

// ==========================================
// DelimitedText Parser 实现（CSV）
// ==========================================
pub struct DelimitedTextParser;

impl DelimitedTextParser {
    fn read_rows(&self, text: &str) -> ImportResult<Vec<SheetRow>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false) // 表头由 ColumnMapping 决定
            .flexible(false) // 行列数必须一致
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
            rows.push(SheetRow {
                line,
                cells: record.iter().map(|v| v.trim().to_string()).collect(),
            });
        }
        Ok(rows)
    }
}

impl PayloadParser for DelimitedTextParser {
    fn parse(
        &self,
        payload: &ImportPayload,
        mapping: Option<&ColumnMapping>,
    ) -> ImportResult<ParsedPayload> {
        match payload {
            ImportPayload::DelimitedText(text) => {
                let rows = self.read_rows(text)?;
                Ok(ParsedPayload {
                    header: None,
                    candidates: map_rows(rows, mapping)?,
                    goals: Vec::new(),
                })
            }
            other => Err(ImportError::UnsupportedFormat(other.source_kind().to_string())),
        }
    }
}

// ==========================================
// Spreadsheet Parser 实现（.xlsx 第一个工作表）
// ==========================================
pub struct SpreadsheetParser;

impl SpreadsheetParser {
    fn read_rows(&self, bytes: &[u8]) -> ImportResult<Vec<SheetRow>> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))?;

        let sheet_names = workbook.sheet_names();
        let first_sheet = sheet_names
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;

        let range = workbook.worksheet_range(&first_sheet)?;
        let start_row = range.start().map(|(r, _)| r as usize).unwrap_or(0);

        Ok(range
            .rows()
            .enumerate()
            .map(|(i, cells)| SheetRow {
                line: start_row + i + 1,
                cells: cells.iter().map(|c| c.to_string().trim().to_string()).collect(),
            })
            .collect())
    }
}

impl PayloadParser for SpreadsheetParser {
    fn parse(
        &self,
        payload: &ImportPayload,
        mapping: Option<&ColumnMapping>,
    ) -> ImportResult<ParsedPayload> {
        match payload {
            ImportPayload::Spreadsheet(bytes) => {
                let rows = self.read_rows(bytes)?;
                Ok(ParsedPayload {
                    header: None,
                    candidates: map_rows(rows, mapping)?,
                    goals: Vec::new(),
                })
            }
            other => Err(ImportError::UnsupportedFormat(other.source_kind().to_string())),
        }
    }
}

// ==========================================
// 通用载荷解析器（根据载荷类型自动选择）
// ==========================================
pub struct UniversalPayloadParser;

impl PayloadParser for UniversalPayloadParser {
    fn parse(
        &self,
        payload: &ImportPayload,
        mapping: Option<&ColumnMapping>,
    ) -> ImportResult<ParsedPayload> {
        match payload {
            ImportPayload::Structured(_) => StructuredParser.parse(payload, mapping),
            ImportPayload::DelimitedText(_) => DelimitedTextParser.parse(payload, mapping),
            ImportPayload::Spreadsheet(_) => SpreadsheetParser.parse(payload, mapping),
        }
    }
}

/// 按扩展名读取文件为载荷（供 CLI 等外部协作层使用）
pub fn payload_from_file<P: AsRef<Path>>(file_path: P) -> ImportResult<ImportPayload> {
    let path = file_path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "json" => Ok(ImportPayload::Structured(std::fs::read_to_string(path)?)),
        "csv" | "txt" => Ok(ImportPayload::DelimitedText(std::fs::read_to_string(path)?)),
        "xlsx" => Ok(ImportPayload::Spreadsheet(std::fs::read(path)?)),
        _ => Err(ImportError::UnsupportedFormat(ext)),
    }
}
