// ==========================================
// buy2rent 表格导入 - 核心库
// ==========================================
// 系统定位: 产品清单导入（解析 → 列映射 → 行校验），人工复核后提交
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 解析、映射、校验
pub mod importer;

// 配置层 - 导入配置
pub mod config;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    ApartmentRef, CellValue, FieldMapping, ImportField, ImportReport, ImportSummary, MappedField,
    ParsedSheet, ProductImportRecord, RawRow, RowReport, RowVerdict, ValidationOutcome,
};

// 导入器
pub use importer::{
    ColumnMapper, ImportError, ImportResult, ImportSession, ProductSheetImporter, RowValidator,
    SheetImporter, StaticApartmentDirectory,
};

// 配置
pub use config::{ConfigManager, ImportConfigReader};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "buy2rent 表格导入";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
