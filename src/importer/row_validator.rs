// ==========================================
// buy2rent 表格导入 - 行校验器
// ==========================================
// 职责: 单行可导入性判定
// 输出: errors（阻断） + warnings（提示）
// 红线: 纯函数，不修改任何输入
// ==========================================

use crate::domain::{ApartmentRef, CellValue, FieldMapping, ImportField, RawRow, ValidationOutcome};
use crate::importer::data_cleaner::DataCleaner;

/// 必填字段（按检查顺序）
pub const REQUIRED_FIELDS: [ImportField; 7] = [
    ImportField::Product,
    ImportField::Vendor,
    ImportField::VendorLink,
    ImportField::Sku,
    ImportField::UnitPrice,
    ImportField::Qty,
    ImportField::Apartment,
];

/// 默认 ETA 日期格式
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y%m%d",
    "%d.%m.%Y",
    "%m/%d/%Y",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d %B %Y",
    "%B %d, %Y",
];

#[derive(Debug, Clone)]
pub struct RowValidator {
    cleaner: DataCleaner,
    date_formats: Vec<String>,
}

impl Default for RowValidator {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect())
    }
}

impl RowValidator {
    pub fn new(date_formats: Vec<String>) -> Self {
        Self {
            cleaner: DataCleaner,
            date_formats,
        }
    }

    pub fn date_formats(&self) -> &[String] {
        &self.date_formats
    }

    /// 取字段原始值：映射到该字段的第一个列头，再读该列头的单元格
    pub fn field_value<'a>(
        &self,
        row: &'a RawRow,
        mapping: &FieldMapping,
        field: ImportField,
    ) -> Option<&'a CellValue> {
        mapping.header_for(field).and_then(|header| row.get(header))
    }

    /// 取字段的非空文本值
    pub fn present_value(
        &self,
        row: &RawRow,
        mapping: &FieldMapping,
        field: ImportField,
    ) -> Option<String> {
        self.cleaner
            .normalize_null(self.field_value(row, mapping, field))
    }

    /// 查找匹配的公寓（名称不区分大小写 / id 精确）
    pub fn find_apartment<'a>(
        &self,
        value: &str,
        apartments: &'a [ApartmentRef],
    ) -> Option<&'a ApartmentRef> {
        apartments.iter().find(|apt| apt.matches(value))
    }

    /// 校验单行
    pub fn validate_row(
        &self,
        row: &RawRow,
        mapping: &FieldMapping,
        apartments: &[ApartmentRef],
    ) -> ValidationOutcome {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        // 必填字段
        for field in REQUIRED_FIELDS {
            if self.present_value(row, mapping, field).is_none() {
                errors.push(format!("Missing {}", field));
            }
        }

        // 公寓存在性
        if let Some(apartment) = self.present_value(row, mapping, ImportField::Apartment) {
            if self.find_apartment(&apartment, apartments).is_none() {
                errors.push("Apartment not found".to_string());
            }
        }

        // 单价
        self.check_amount(
            row,
            mapping,
            ImportField::UnitPrice,
            "Invalid unit price",
            "Price is 0",
            &mut errors,
            &mut warnings,
        );

        // 数量
        self.check_amount(
            row,
            mapping,
            ImportField::Qty,
            "Invalid quantity",
            "Quantity is 0",
            &mut errors,
            &mut warnings,
        );

        // 链接（仅提示）
        if let Some(link) = self.present_value(row, mapping, ImportField::VendorLink) {
            if !self.cleaner.is_absolute_url(&link) {
                warnings.push("Invalid URL format".to_string());
            }
        }

        // 预计到货日期
        if let Some(value) = self.field_value(row, mapping, ImportField::Eta) {
            if !value.is_blank() && self.cleaner.parse_date(value, &self.date_formats).is_none() {
                errors.push("Invalid ETA date".to_string());
            }
        }

        ValidationOutcome::from_messages(errors, warnings)
    }

    #[allow(clippy::too_many_arguments)]
    fn check_amount(
        &self,
        row: &RawRow,
        mapping: &FieldMapping,
        field: ImportField,
        invalid_message: &str,
        zero_message: &str,
        errors: &mut Vec<String>,
        warnings: &mut Vec<String>,
    ) {
        let value = match self.field_value(row, mapping, field) {
            Some(v) if !v.is_blank() => v,
            _ => return,
        };

        match self.cleaner.parse_non_negative(value) {
            None => errors.push(invalid_message.to_string()),
            Some(n) if n == 0.0 => warnings.push(zero_message.to_string()),
            Some(_) => {}
        }
    }
}
