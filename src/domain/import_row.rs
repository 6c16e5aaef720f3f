// ==========================================
// buy2rent 表格导入 - 导入行领域模型
// ==========================================
// 职责: 解析结果、校验结果、导入报告、导入记录
// 红线: RawRow / ParsedSheet 解析后不可变
// ==========================================

use crate::domain::mapping::FieldMapping;
use crate::domain::types::RowVerdict;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ==========================================
// CellValue - 单元格值
// ==========================================
// 空单元格不存储
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    /// 文本形式（整数值不带小数点）
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
        }
    }

    /// 去除首尾空白后是否为空
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(_) => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

// ==========================================
// RawRow - 原始数据行
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub row_number: usize,                    // 源表格行号（1 起，含表头行）
    pub cells: BTreeMap<String, CellValue>,   // 列头 → 值（空值省略）
}

impl RawRow {
    pub fn new(row_number: usize) -> Self {
        Self {
            row_number,
            cells: BTreeMap::new(),
        }
    }

    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells.get(header)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

// ==========================================
// ParsedSheet - 解析结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedSheet {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

// ==========================================
// ApartmentRef - 公寓引用（外部只读）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApartmentRef {
    pub id: String,
    pub name: String,
}

impl ApartmentRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// 名称不区分大小写匹配，或 id 精确匹配
    pub fn matches(&self, value: &str) -> bool {
        self.id == value || self.name.to_lowercase() == value.to_lowercase()
    }
}

// ==========================================
// ValidationOutcome - 单行校验结果
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub errors: Vec<String>,   // 阻断
    pub warnings: Vec<String>, // 提示
}

impl ValidationOutcome {
    pub fn from_messages(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    pub fn verdict(&self) -> RowVerdict {
        if !self.valid {
            RowVerdict::Invalid
        } else if self.warnings.is_empty() {
            RowVerdict::Valid
        } else {
            RowVerdict::ValidWithWarnings
        }
    }
}

// ==========================================
// RowReport / ImportSummary / ImportReport
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowReport {
    pub row_number: usize,
    pub outcome: ValidationOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total_rows: usize,    // 总行数
    pub valid: usize,         // 可导入（无警告）
    pub with_warnings: usize, // 可导入（有警告）
    pub invalid: usize,       // 不可导入
}

impl ImportSummary {
    pub fn from_rows(rows: &[RowReport]) -> Self {
        let mut summary = ImportSummary {
            total_rows: rows.len(),
            ..Default::default()
        };
        for row in rows {
            match row.outcome.verdict() {
                RowVerdict::Valid => summary.valid += 1,
                RowVerdict::ValidWithWarnings => summary.with_warnings += 1,
                RowVerdict::Invalid => summary.invalid += 1,
            }
        }
        summary
    }

    pub fn importable(&self) -> usize {
        self.valid + self.with_warnings
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub session_id: String,
    pub file_name: String,
    pub headers: Vec<String>,
    pub mapping: FieldMapping,
    pub rows: Vec<RowReport>,
    pub summary: ImportSummary,
}

// ==========================================
// ProductImportRecord - 可提交的产品记录
// ==========================================
// 用途: 校验通过的行，提交给后端创建接口
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductImportRecord {
    pub row_number: usize,
    pub apartment_id: String,
    pub product: String,
    pub vendor: String,
    pub vendor_link: String,
    pub sku: String,
    pub unit_price: f64,
    pub qty: f64,
    pub category: Option<String>,
    pub room: Option<String>,
    pub availability: Option<String>,
    pub status: Option<String>,
    pub eta: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub replacement_of: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_value_as_text() {
        assert_eq!(CellValue::Number(12.0).as_text(), "12");
        assert_eq!(CellValue::Number(12.5).as_text(), "12.5");
        assert_eq!(CellValue::Number(0.0).as_text(), "0");
        assert_eq!(CellValue::from(" abc ").as_text(), " abc ");
    }

    #[test]
    fn test_cell_value_blank() {
        assert!(CellValue::from("   ").is_blank());
        assert!(!CellValue::from("x").is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_apartment_matches() {
        let apt = ApartmentRef::new("apt-1", "sunset villa");
        assert!(apt.matches("Sunset Villa"));
        assert!(apt.matches("apt-1"));
        assert!(!apt.matches("APT-1"));
        assert!(!apt.matches("Harbor Loft"));
    }

    #[test]
    fn test_summary_counts_verdicts() {
        let rows = vec![
            RowReport {
                row_number: 2,
                outcome: ValidationOutcome::from_messages(vec![], vec![]),
            },
            RowReport {
                row_number: 3,
                outcome: ValidationOutcome::from_messages(vec![], vec!["Price is 0".into()]),
            },
            RowReport {
                row_number: 4,
                outcome: ValidationOutcome::from_messages(vec!["Missing sku".into()], vec![]),
            },
        ];

        let summary = ImportSummary::from_rows(&rows);
        assert_eq!(summary.total_rows, 3);
        assert_eq!(summary.valid, 1);
        assert_eq!(summary.with_warnings, 1);
        assert_eq!(summary.invalid, 1);
        assert_eq!(summary.importable(), 2);
    }
}
