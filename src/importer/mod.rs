// ==========================================
// buy2rent 表格导入 - 导入层
// ==========================================
// 职责: 表格文件 → 列映射 → 行校验 → 可提交记录
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod column_mapper;
pub mod data_cleaner;
pub mod error;
pub mod file_parser;
pub mod record_builder;
pub mod row_validator;
pub mod sheet_importer_impl;
pub mod sheet_importer_trait;

// 重导出核心类型
pub use column_mapper::{ColumnMapper, KeywordRule, KEYWORD_RULES};
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use file_parser::{spawn_parse, CsvParser, ExcelParser, ParseTask, UniversalFileParser};
pub use record_builder::RecordBuilder;
pub use row_validator::{RowValidator, REQUIRED_FIELDS};
pub use sheet_importer_impl::{ImportSession, ProductSheetImporter, StaticApartmentDirectory};

// 重导出 Trait 接口
pub use sheet_importer_trait::{ApartmentDirectory, SheetImporter, SheetParser};
