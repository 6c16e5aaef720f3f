// ==========================================
// buy2rent 表格导入 - 列自动映射器
// ==========================================
// 职责: 源列头 → 导入字段（关键字子串匹配）
// 规则: 按规则表声明顺序，首个命中者胜出；无命中 → skip
// ==========================================

use crate::domain::{ColumnMapping, FieldMapping, ImportField, MappedField};

/// 单条映射规则
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub field: ImportField,
    pub keywords: &'static [&'static str],
}

impl KeywordRule {
    /// normalized 需已小写并去除首尾空白
    pub fn matches(&self, normalized: &str) -> bool {
        self.keywords.iter().any(|kw| normalized.contains(kw))
    }
}

// ==========================================
// 关键字规则表（顺序即优先级）
// ==========================================
// 注意: "amount" 同时出现在 unitPrice 与 qty 中，按顺序总是命中 unitPrice
pub const KEYWORD_RULES: &[KeywordRule] = &[
    KeywordRule {
        field: ImportField::Apartment,
        keywords: &["apartment", "apt", "flat", "property"],
    },
    KeywordRule {
        field: ImportField::Product,
        keywords: &["product", "item", "article"],
    },
    KeywordRule {
        field: ImportField::Vendor,
        keywords: &["vendor", "supplier", "brand", "manufacturer"],
    },
    KeywordRule {
        field: ImportField::VendorLink,
        keywords: &["link", "website", "webshop", "href"],
    },
    KeywordRule {
        field: ImportField::Sku,
        keywords: &["sku", "code", "part no", "model"],
    },
    KeywordRule {
        field: ImportField::UnitPrice,
        keywords: &["unit price", "price", "cost", "amount"],
    },
    KeywordRule {
        field: ImportField::Qty,
        keywords: &["qty", "quantity", "pcs", "pieces", "count", "amount"],
    },
    KeywordRule {
        field: ImportField::Category,
        keywords: &["category", "type", "group"],
    },
    KeywordRule {
        field: ImportField::Room,
        keywords: &["room", "location", "area"],
    },
    KeywordRule {
        field: ImportField::Availability,
        keywords: &["availability", "available", "stock"],
    },
    KeywordRule {
        field: ImportField::Status,
        keywords: &["status", "state"],
    },
    KeywordRule {
        field: ImportField::Eta,
        keywords: &["eta", "delivery date", "arrival", "expected"],
    },
    KeywordRule {
        field: ImportField::ImageUrl,
        keywords: &["image", "photo", "picture", "img"],
    },
    KeywordRule {
        field: ImportField::ReplacementOf,
        keywords: &["replacement", "replaces", "substitute"],
    },
    KeywordRule {
        field: ImportField::Notes,
        keywords: &["note", "comment", "remark"],
    },
];

#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnMapper;

impl ColumnMapper {
    /// 推断单个列头的映射目标
    pub fn guess_field(&self, header: &str) -> MappedField {
        let normalized = header.trim().to_lowercase();

        KEYWORD_RULES
            .iter()
            .find(|rule| rule.matches(&normalized))
            .map(|rule| MappedField::Field(rule.field))
            .unwrap_or(MappedField::Skip)
    }

    /// 为全部列头生成映射（一一对应，顺序不变）
    pub fn auto_map(&self, headers: &[String]) -> FieldMapping {
        FieldMapping::new(
            headers
                .iter()
                .map(|header| ColumnMapping {
                    header: header.clone(),
                    target: self.guess_field(header),
                })
                .collect(),
        )
    }
}
