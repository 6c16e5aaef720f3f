// ==========================================
// buy2rent 表格导入 - 文件解析器实现
// ==========================================
// 阶段 0: 文件字节 → 表头 + 数据行
// 支持: Excel (.xlsx/.xlsm/.xls/.xlsb/.ods) / CSV (.csv)
// 红线: 只读取第一个工作表
// ==========================================

use crate::domain::{CellValue, ParsedSheet, RawRow};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::sheet_importer_trait::SheetParser;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::Timelike;
use csv::ReaderBuilder;
use std::io::Cursor;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// 默认进度上报间隔（行）
pub const DEFAULT_PROGRESS_INTERVAL_ROWS: usize = 50;

/// 解码完成时的进度值，剩余部分分配给行构建
const DECODED_PROGRESS: u8 = 30;

/// 单行网格: (源行号, 单元格)
type GridRow = (usize, Vec<Option<CellValue>>);

// ==========================================
// 进度上报（单调不减，范围 [0, 100]）
// ==========================================
pub struct ProgressTracker<'a> {
    last: Option<u8>,
    sink: &'a mut dyn FnMut(u8),
}

impl<'a> ProgressTracker<'a> {
    pub fn new(sink: &'a mut dyn FnMut(u8)) -> Self {
        Self { last: None, sink }
    }

    pub fn report(&mut self, value: u8) {
        let value = value.min(100);
        if self.last.map_or(true, |last| value > last) {
            self.last = Some(value);
            (self.sink)(value);
        }
    }

    pub fn last(&self) -> Option<u8> {
        self.last
    }
}

// ==========================================
// 表格构建（列/行保留规则）
// ==========================================
// 1. 列: 表头 TRIM 后非空才保留
// 2. 行: 任一原始单元格 TRIM 后非空才保留
// 3. 值: 仅复制保留列中 TRIM 后非空的值
// 4. 无任何键的行丢弃
fn build_sheet(
    grid: Vec<GridRow>,
    progress_interval_rows: usize,
    progress: &mut ProgressTracker<'_>,
) -> ImportResult<ParsedSheet> {
    let mut rows_iter = grid.into_iter();
    let (_, header_cells) = rows_iter.next().ok_or(ImportError::EmptySheet)?;

    let retained: Vec<(usize, String)> = header_cells
        .iter()
        .enumerate()
        .filter_map(|(col_idx, cell)| {
            let header = cell.as_ref()?.as_text().trim().to_string();
            if header.is_empty() {
                None
            } else {
                Some((col_idx, header))
            }
        })
        .collect();

    let headers: Vec<String> = retained.iter().map(|(_, h)| h.clone()).collect();

    let data_rows: Vec<GridRow> = rows_iter.collect();
    let total = data_rows.len().max(1);
    let interval = progress_interval_rows.max(1);
    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for (idx, (row_number, cells)) in data_rows.into_iter().enumerate() {
        if idx % interval == 0 {
            let share = (idx * (100 - DECODED_PROGRESS as usize)) / total;
            progress.report(DECODED_PROGRESS + share as u8);
        }

        let has_content = cells.iter().flatten().any(|cell| !cell.is_blank());
        if !has_content {
            dropped += 1;
            continue;
        }

        let mut raw_row = RawRow::new(row_number);
        for (col_idx, header) in &retained {
            if let Some(Some(cell)) = cells.get(*col_idx) {
                if !cell.is_blank() {
                    raw_row.cells.insert(header.clone(), cell.clone());
                }
            }
        }

        if raw_row.is_empty() {
            dropped += 1;
            continue;
        }

        rows.push(raw_row);
    }

    debug!(
        headers = headers.len(),
        rows = rows.len(),
        dropped = dropped,
        "表格构建完成"
    );

    Ok(ParsedSheet { headers, rows })
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser {
    progress_interval_rows: usize,
    cleaner: DataCleaner,
}

impl Default for ExcelParser {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRESS_INTERVAL_ROWS)
    }
}

impl ExcelParser {
    pub fn new(progress_interval_rows: usize) -> Self {
        Self {
            progress_interval_rows,
            cleaner: DataCleaner,
        }
    }

    /// calamine 单元格 → CellValue（空单元格 → None）
    pub fn convert_cell(&self, cell: &Data) -> Option<CellValue> {
        match cell {
            Data::Empty => None,
            Data::String(s) => Some(CellValue::Text(s.clone())),
            Data::Float(f) => Some(CellValue::Number(*f)),
            Data::Int(i) => Some(CellValue::Number(*i as f64)),
            Data::Bool(b) => Some(CellValue::Text(
                if *b { "TRUE" } else { "FALSE" }.to_string(),
            )),
            Data::DateTime(dt) => {
                let serial = dt.as_f64();
                match self.cleaner.excel_serial_to_datetime(serial) {
                    Some(dt) if dt.time().num_seconds_from_midnight() == 0 => {
                        Some(CellValue::Text(dt.format("%Y-%m-%d").to_string()))
                    }
                    Some(dt) => Some(CellValue::Text(dt.format("%Y-%m-%dT%H:%M:%S").to_string())),
                    None => Some(CellValue::Number(serial)),
                }
            }
            Data::DateTimeIso(s) | Data::DurationIso(s) => Some(CellValue::Text(s.clone())),
            Data::Error(e) => Some(CellValue::Text(e.to_string())),
        }
    }

    /// 工作表区域 → 网格（行号为 1 起的源行号）
    pub fn range_to_grid(&self, range: &calamine::Range<Data>) -> Vec<GridRow> {
        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
        range
            .rows()
            .enumerate()
            .map(|(idx, cells)| {
                (
                    first_row + idx + 1,
                    cells.iter().map(|c| self.convert_cell(c)).collect(),
                )
            })
            .collect()
    }

    /// 直接由工作表区域构建（供测试与内嵌调用）
    pub fn parse_range(
        &self,
        range: &calamine::Range<Data>,
        progress: &mut dyn FnMut(u8),
    ) -> ImportResult<ParsedSheet> {
        let mut tracker = ProgressTracker::new(progress);
        tracker.report(0);

        let grid = self.range_to_grid(range);
        if grid.is_empty() {
            return Err(ImportError::EmptySheet);
        }
        tracker.report(DECODED_PROGRESS);

        let sheet = build_sheet(grid, self.progress_interval_rows, &mut tracker)?;
        tracker.report(100);
        Ok(sheet)
    }
}

impl SheetParser for ExcelParser {
    fn parse_bytes(
        &self,
        bytes: &[u8],
        progress: &mut dyn FnMut(u8),
    ) -> ImportResult<ParsedSheet> {
        // 打开工作簿（自动识别 xlsx/xls/xlsb/ods）
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

        // 读取第一个 sheet
        let sheet_names = workbook.sheet_names();
        let sheet_name = match sheet_names.first() {
            Some(name) => name.clone(),
            None => return Err(ImportError::EmptySheet),
        };
        debug!(sheet = %sheet_name, sheets = sheet_names.len(), "读取第一个工作表");

        let range = workbook.worksheet_range(&sheet_name)?;
        self.parse_range(&range, progress)
    }
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser {
    progress_interval_rows: usize,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRESS_INTERVAL_ROWS)
    }
}

impl CsvParser {
    pub fn new(progress_interval_rows: usize) -> Self {
        Self {
            progress_interval_rows,
        }
    }
}

impl SheetParser for CsvParser {
    fn parse_bytes(
        &self,
        bytes: &[u8],
        progress: &mut dyn FnMut(u8),
    ) -> ImportResult<ParsedSheet> {
        let mut tracker = ProgressTracker::new(progress);
        tracker.report(0);

        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        // 按字节读取: 非 UTF-8 字节（如 Windows-1252 导出）替换为 U+FFFD，不中断整表
        let mut grid = Vec::new();
        let mut lossy_cells = 0usize;
        for (idx, result) in reader.byte_records().enumerate() {
            let record = result?;
            // 行号取记录起始的源文件行（跳过的空行、跨行引号单元格均计入）
            let row_number = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 1);

            let cells = record
                .iter()
                .map(|raw| {
                    if raw.is_empty() {
                        return None;
                    }
                    let text = match std::str::from_utf8(raw) {
                        Ok(s) => s.to_string(),
                        Err(_) => {
                            lossy_cells += 1;
                            String::from_utf8_lossy(raw).into_owned()
                        }
                    };
                    Some(CellValue::Text(text))
                })
                .collect();
            grid.push((row_number, cells));
        }

        if grid.is_empty() {
            return Err(ImportError::EmptySheet);
        }
        if lossy_cells > 0 {
            warn!(cells = lossy_cells, "CSV 含非 UTF-8 字节，已替换为 U+FFFD");
        }
        tracker.report(DECODED_PROGRESS);

        let sheet = build_sheet(grid, self.progress_interval_rows, &mut tracker)?;
        tracker.report(100);
        Ok(sheet)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    /// 根据文件名选择解析器
    pub fn for_file_name(
        file_name: &str,
        progress_interval_rows: usize,
    ) -> ImportResult<Box<dyn SheetParser>> {
        let ext = std::path::Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Ok(Box::new(CsvParser::new(progress_interval_rows))),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => {
                Ok(Box::new(ExcelParser::new(progress_interval_rows)))
            }
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

// ==========================================
// 异步解析任务
// ==========================================
// 一次性解码: 无取消、无部分结果，进度通过 watch 通道旁路上报
pub struct ParseTask {
    pub progress: watch::Receiver<u8>,
    handle: JoinHandle<ImportResult<ParsedSheet>>,
}

impl ParseTask {
    /// 等待解析完成
    pub async fn finish(self) -> ImportResult<ParsedSheet> {
        self.handle
            .await
            .map_err(|e| ImportError::InternalError(format!("解析任务异常: {}", e)))?
    }
}

/// 在阻塞线程池中解析
pub fn spawn_parse(parser: Box<dyn SheetParser>, bytes: Vec<u8>) -> ParseTask {
    let (tx, rx) = watch::channel(0u8);

    let handle = tokio::task::spawn_blocking(move || {
        let mut on_progress = |value: u8| {
            // 无接收方时忽略
            let _ = tx.send(value);
        };
        parser.parse_bytes(&bytes, &mut on_progress)
    });

    ParseTask {
        progress: rx,
        handle,
    }
}
