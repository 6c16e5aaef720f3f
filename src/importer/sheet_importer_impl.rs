// ==========================================
// buy2rent 表格导入 - 表格导入器实现
// ==========================================
// 职责: 整合导入流程，从文件字节到待复核会话
// 流程: 解析 → 自动映射 → 公寓目录 → 会话（按需校验）
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::{
    ApartmentRef, FieldMapping, ImportReport, ImportSummary, MappedField, ParsedSheet,
    ProductImportRecord, RowReport,
};
use crate::importer::column_mapper::ColumnMapper;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{spawn_parse, ParseTask, UniversalFileParser};
use crate::importer::record_builder::RecordBuilder;
use crate::importer::row_validator::RowValidator;
use crate::importer::sheet_importer_trait::{ApartmentDirectory, SheetImporter};
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// StaticApartmentDirectory - 内存公寓目录
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct StaticApartmentDirectory {
    apartments: Vec<ApartmentRef>,
}

impl StaticApartmentDirectory {
    pub fn new(apartments: Vec<ApartmentRef>) -> Self {
        Self { apartments }
    }

    /// 从 JSON 数组文件加载（`[{"id": "...", "name": "..."}]`）
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            ImportError::ApartmentDirectoryError(format!("{}: {}", path.display(), e))
        })?;
        let apartments: Vec<ApartmentRef> = serde_json::from_str(&raw).map_err(|e| {
            ImportError::ApartmentDirectoryError(format!("{}: {}", path.display(), e))
        })?;
        Ok(Self::new(apartments))
    }
}

#[async_trait]
impl ApartmentDirectory for StaticApartmentDirectory {
    async fn list_apartments(&self) -> ImportResult<Vec<ApartmentRef>> {
        Ok(self.apartments.clone())
    }
}

// ==========================================
// ImportSession - 待复核的导入会话
// ==========================================
// 红线: 解析结果与公寓列表只读；映射可人工覆写
// 校验结果每次按当前映射重新计算
#[derive(Debug, Clone)]
pub struct ImportSession {
    session_id: Uuid,
    file_name: String,
    sheet: ParsedSheet,
    mapping: FieldMapping,
    apartments: Vec<ApartmentRef>,
    validator: RowValidator,
    builder: RecordBuilder,
}

impl ImportSession {
    pub fn new(
        file_name: String,
        sheet: ParsedSheet,
        mapping: FieldMapping,
        apartments: Vec<ApartmentRef>,
        validator: RowValidator,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            file_name,
            sheet,
            mapping,
            apartments,
            builder: RecordBuilder::new(validator.clone()),
            validator,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn sheet(&self) -> &ParsedSheet {
        &self.sheet
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    pub fn apartments(&self) -> &[ApartmentRef] {
        &self.apartments
    }

    /// 人工覆写列映射
    pub fn override_mapping(&mut self, header: &str, target: MappedField) -> ImportResult<()> {
        let previous = self.mapping.target_of(header);
        if !self.mapping.set(header, target) {
            return Err(ImportError::UnknownHeader(header.to_string()));
        }
        info!(
            session_id = %self.session_id,
            header = header,
            from = ?previous,
            to = %target,
            "列映射已覆写"
        );
        Ok(())
    }

    /// 按当前映射校验全部行
    pub fn validate_rows(&self) -> Vec<RowReport> {
        self.sheet
            .rows
            .iter()
            .map(|row| RowReport {
                row_number: row.row_number,
                outcome: self
                    .validator
                    .validate_row(row, &self.mapping, &self.apartments),
            })
            .collect()
    }

    /// 生成导入报告
    pub fn report(&self) -> ImportReport {
        let rows = self.validate_rows();
        let summary = ImportSummary::from_rows(&rows);

        debug!(
            session_id = %self.session_id,
            total = summary.total_rows,
            valid = summary.valid,
            with_warnings = summary.with_warnings,
            invalid = summary.invalid,
            "导入报告生成"
        );

        ImportReport {
            session_id: self.session_id.to_string(),
            file_name: self.file_name.clone(),
            headers: self.sheet.headers.clone(),
            mapping: self.mapping.clone(),
            rows,
            summary,
        }
    }

    /// 可提交的导入记录（仅校验通过的行）
    pub fn importable_records(&self) -> Vec<ProductImportRecord> {
        self.sheet
            .rows
            .iter()
            .filter_map(|row| {
                self.builder
                    .build_record(row, &self.mapping, &self.apartments)
            })
            .collect()
    }
}

// ==========================================
// ProductSheetImporter - 产品清单导入器
// ==========================================
pub struct ProductSheetImporter<D, C>
where
    D: ApartmentDirectory,
    C: ImportConfigReader,
{
    // 公寓目录
    directory: D,

    // 配置读取器
    config: C,

    // 列映射器
    mapper: ColumnMapper,
}

impl<D, C> ProductSheetImporter<D, C>
where
    D: ApartmentDirectory,
    C: ImportConfigReader,
{
    /// 创建新的导入器实例
    ///
    /// # 参数
    /// - directory: 公寓目录
    /// - config: 配置读取器
    pub fn new(directory: D, config: C) -> Self {
        Self {
            directory,
            config,
            mapper: ColumnMapper,
        }
    }
}

#[async_trait]
impl<D, C> SheetImporter for ProductSheetImporter<D, C>
where
    D: ApartmentDirectory,
    C: ImportConfigReader,
{
    fn start_parse(&self, file_name: &str, bytes: Vec<u8>) -> ImportResult<ParseTask> {
        let limit = self.config.get_max_file_bytes()?;
        if bytes.len() > limit {
            warn!(file_name = file_name, size = bytes.len(), limit = limit, "文件过大，拒绝解析");
            return Err(ImportError::FileTooLarge {
                size: bytes.len(),
                limit,
            });
        }

        let interval = self.config.get_progress_interval_rows()?;
        let parser = UniversalFileParser::for_file_name(file_name, interval)?;

        debug!(file_name = file_name, size = bytes.len(), "启动后台解析");
        Ok(spawn_parse(parser, bytes))
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn import_bytes(&self, file_name: &str, bytes: Vec<u8>) -> ImportResult<ImportSession> {
        info!(file_name = file_name, "开始导入表格");
        let task = self.start_parse(file_name, bytes)?;
        self.finish_import(file_name, task).await
    }

    #[instrument(skip(self, task))]
    async fn finish_import(&self, file_name: &str, task: ParseTask) -> ImportResult<ImportSession> {
        // === 步骤 1: 等待解析完成 ===
        let sheet = task.finish().await?;
        info!(
            headers = sheet.headers.len(),
            rows = sheet.rows.len(),
            "文件解析完成"
        );

        // === 步骤 2: 列自动映射 ===
        let mapping = self.mapper.auto_map(&sheet.headers);
        let skipped = mapping
            .columns()
            .iter()
            .filter(|c| c.target.is_skip())
            .count();
        info!(
            mapped = mapping.len() - skipped,
            skipped = skipped,
            "列自动映射完成"
        );

        // === 步骤 3: 公寓目录 ===
        let apartments = self.directory.list_apartments().await?;
        debug!(apartments = apartments.len(), "公寓目录读取完成");

        // === 步骤 4: 会话 ===
        let validator = RowValidator::new(self.config.get_eta_date_formats()?);
        let session = ImportSession::new(
            file_name.to_string(),
            sheet,
            mapping,
            apartments,
            validator,
        );
        info!(session_id = %session.session_id(), "导入会话已创建");

        Ok(session)
    }

    #[instrument(skip(self))]
    async fn import_file(&self, path: &Path) -> ImportResult<ImportSession> {
        let bytes = tokio::fs::read(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ImportError::FileNotFound(path.display().to_string()),
            _ => ImportError::FileReadError(format!("{}: {}", path.display(), e)),
        })?;

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        self.import_bytes(&file_name, bytes).await
    }
}
