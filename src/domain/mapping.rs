// ==========================================
// buy2rent 表格导入 - 列映射模型
// ==========================================
// 用途: 自动映射器生成，人工复核可覆写，行校验器只读
// ==========================================

use crate::domain::types::{ImportField, MappedField};
use serde::{Deserialize, Serialize};

/// 单列映射
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub header: String,
    pub target: MappedField,
}

// ==========================================
// FieldMapping - 列头 → 字段映射
// ==========================================
// 红线: 与 HeaderList 一一对应，顺序一致
// 多个列头可映射到同一字段，查找时取列头顺序中的第一个
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping {
    columns: Vec<ColumnMapping>,
}

impl FieldMapping {
    pub fn new(columns: Vec<ColumnMapping>) -> Self {
        Self { columns }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[ColumnMapping] {
        &self.columns
    }

    /// 查询某列头的映射目标
    pub fn target_of(&self, header: &str) -> Option<MappedField> {
        self.columns
            .iter()
            .find(|c| c.header == header)
            .map(|c| c.target)
    }

    /// 查询映射到某字段的第一个列头
    pub fn header_for(&self, field: ImportField) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.target == MappedField::Field(field))
            .map(|c| c.header.as_str())
    }

    /// 人工覆写某列头的映射目标
    ///
    /// 重复列头会一并覆写；返回是否存在该列头
    pub fn set(&mut self, header: &str, target: MappedField) -> bool {
        let mut found = false;
        for column in self.columns.iter_mut().filter(|c| c.header == header) {
            column.target = target;
            found = true;
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FieldMapping {
        FieldMapping::new(vec![
            ColumnMapping {
                header: "Price".to_string(),
                target: MappedField::Field(ImportField::UnitPrice),
            },
            ColumnMapping {
                header: "Cost".to_string(),
                target: MappedField::Field(ImportField::UnitPrice),
            },
            ColumnMapping {
                header: "Misc".to_string(),
                target: MappedField::Skip,
            },
        ])
    }

    #[test]
    fn test_header_for_returns_first_in_order() {
        let mapping = sample();
        assert_eq!(mapping.header_for(ImportField::UnitPrice), Some("Price"));
        assert_eq!(mapping.header_for(ImportField::Qty), None);
    }

    #[test]
    fn test_set_overrides_target() {
        let mut mapping = sample();
        assert!(mapping.set("Price", MappedField::Skip));
        assert_eq!(mapping.header_for(ImportField::UnitPrice), Some("Cost"));
        assert_eq!(mapping.len(), 3);
    }

    #[test]
    fn test_set_unknown_header() {
        let mut mapping = sample();
        assert!(!mapping.set("Nope", MappedField::Skip));
        assert_eq!(mapping, sample());
    }

    #[test]
    fn test_serializes_as_list() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json[0]["header"], "Price");
        assert_eq!(json[0]["target"], "unitPrice");
        assert_eq!(json[2]["target"], "skip");
    }
}
