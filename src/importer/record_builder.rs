// ==========================================
// buy2rent 表格导入 - 导入记录构建器
// ==========================================
// 职责: 校验通过的 RawRow → ProductImportRecord（类型转换）
// 红线: 校验未通过的行不产出记录
// ==========================================

use crate::domain::{ApartmentRef, FieldMapping, ImportField, ProductImportRecord, RawRow};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::row_validator::RowValidator;

#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    validator: RowValidator,
    cleaner: DataCleaner,
}

impl RecordBuilder {
    pub fn new(validator: RowValidator) -> Self {
        Self {
            validator,
            cleaner: DataCleaner,
        }
    }

    /// 构建导入记录
    ///
    /// # 返回
    /// - Some(ProductImportRecord): 行校验通过
    /// - None: 行校验未通过
    pub fn build_record(
        &self,
        row: &RawRow,
        mapping: &FieldMapping,
        apartments: &[ApartmentRef],
    ) -> Option<ProductImportRecord> {
        if !self.validator.validate_row(row, mapping, apartments).valid {
            return None;
        }

        let text = |field| self.validator.present_value(row, mapping, field);
        let number = |field| {
            self.validator
                .field_value(row, mapping, field)
                .and_then(|v| self.cleaner.parse_non_negative(v))
        };

        let apartment = text(ImportField::Apartment)?;
        let apartment_id = self
            .validator
            .find_apartment(&apartment, apartments)?
            .id
            .clone();

        Some(ProductImportRecord {
            row_number: row.row_number,
            apartment_id,
            product: text(ImportField::Product)?,
            vendor: text(ImportField::Vendor)?,
            vendor_link: text(ImportField::VendorLink)?,
            sku: text(ImportField::Sku)?,
            unit_price: number(ImportField::UnitPrice)?,
            qty: number(ImportField::Qty)?,
            category: text(ImportField::Category),
            room: text(ImportField::Room),
            availability: text(ImportField::Availability),
            status: text(ImportField::Status),
            eta: self
                .validator
                .field_value(row, mapping, ImportField::Eta)
                .and_then(|v| self.cleaner.parse_date(v, self.validator.date_formats())),
            image_url: text(ImportField::ImageUrl),
            replacement_of: text(ImportField::ReplacementOf),
            notes: text(ImportField::Notes),
        })
    }
}
