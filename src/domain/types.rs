// ==========================================
// buy2rent 表格导入 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 导入字段 (Import Field)
// ==========================================
// 红线: 封闭集合,声明顺序即自动映射的优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportField {
    Apartment,     // 公寓
    Product,       // 产品名称
    Vendor,        // 供应商
    VendorLink,    // 供应商链接
    Sku,           // 货号
    UnitPrice,     // 单价
    Qty,           // 数量
    Category,      // 品类
    Room,          // 房间
    Availability,  // 供货情况
    Status,        // 状态
    Eta,           // 预计到货日期
    ImageUrl,      // 图片链接
    ReplacementOf, // 替换的产品
    Notes,         // 备注
}

impl ImportField {
    /// 全部字段（声明顺序）
    pub const ALL: [ImportField; 15] = [
        ImportField::Apartment,
        ImportField::Product,
        ImportField::Vendor,
        ImportField::VendorLink,
        ImportField::Sku,
        ImportField::UnitPrice,
        ImportField::Qty,
        ImportField::Category,
        ImportField::Room,
        ImportField::Availability,
        ImportField::Status,
        ImportField::Eta,
        ImportField::ImageUrl,
        ImportField::ReplacementOf,
        ImportField::Notes,
    ];

    /// 对外字段名（camelCase，与后端 REST 接口一致）
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportField::Apartment => "apartment",
            ImportField::Product => "product",
            ImportField::Vendor => "vendor",
            ImportField::VendorLink => "vendorLink",
            ImportField::Sku => "sku",
            ImportField::UnitPrice => "unitPrice",
            ImportField::Qty => "qty",
            ImportField::Category => "category",
            ImportField::Room => "room",
            ImportField::Availability => "availability",
            ImportField::Status => "status",
            ImportField::Eta => "eta",
            ImportField::ImageUrl => "imageUrl",
            ImportField::ReplacementOf => "replacementOf",
            ImportField::Notes => "notes",
        }
    }
}

impl fmt::Display for ImportField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ImportField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ImportField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("未知导入字段: {}", s))
    }
}

// ==========================================
// 映射目标 (Mapped Field)
// ==========================================
// 序列化格式: 字段名 或 "skip"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MappedField {
    Field(ImportField),
    Skip,
}

impl MappedField {
    pub const SKIP: &'static str = "skip";

    pub fn field(&self) -> Option<ImportField> {
        match self {
            MappedField::Field(field) => Some(*field),
            MappedField::Skip => None,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, MappedField::Skip)
    }
}

impl fmt::Display for MappedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MappedField::Field(field) => write!(f, "{}", field),
            MappedField::Skip => write!(f, "{}", Self::SKIP),
        }
    }
}

impl From<ImportField> for MappedField {
    fn from(field: ImportField) -> Self {
        MappedField::Field(field)
    }
}

impl From<MappedField> for String {
    fn from(value: MappedField) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for MappedField {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for MappedField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::SKIP {
            Ok(MappedField::Skip)
        } else {
            s.parse::<ImportField>().map(MappedField::Field)
        }
    }
}

// ==========================================
// 行校验结论 (Row Verdict)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowVerdict {
    Valid,             // 可导入，无警告
    ValidWithWarnings, // 可导入，有警告
    Invalid,           // 不可导入
}

impl fmt::Display for RowVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowVerdict::Valid => write!(f, "VALID"),
            RowVerdict::ValidWithWarnings => write!(f, "VALID_WITH_WARNINGS"),
            RowVerdict::Invalid => write!(f, "INVALID"),
        }
    }
}
