// ==========================================
// buy2rent 表格导入 - 领域模型层
// ==========================================
// 职责: 定义导入实体与类型
// 红线: 不含解析逻辑,不含校验逻辑
// ==========================================

pub mod import_row;
pub mod mapping;
pub mod types;

// 重导出核心类型
pub use import_row::{
    ApartmentRef, CellValue, ImportReport, ImportSummary, ParsedSheet, ProductImportRecord,
    RawRow, RowReport, ValidationOutcome,
};
pub use mapping::{ColumnMapping, FieldMapping};
pub use types::{ImportField, MappedField, RowVerdict};
