// ==========================================
// buy2rent 表格导入 - 数据清洗器
// ==========================================
// 职责: TRIM / NULL 标准化 / 数值解析 / 日期解析 / URL 校验
// 使用方: 行校验器、记录构建器、文件解析器
// ==========================================

use crate::domain::CellValue;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use url::Url;

/// Excel 日期序列号上限（9999-12-31）
const EXCEL_SERIAL_MAX: f64 = 2_958_466.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct DataCleaner;

impl DataCleaner {
    /// 清洗文本字段（TRIM）
    pub fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    /// 标准化 NULL 值（缺失/空白 → None）
    pub fn normalize_null(&self, value: Option<&CellValue>) -> Option<String> {
        value.and_then(|v| {
            let text = v.as_text();
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// 解析非负有限数值
    ///
    /// # 返回
    /// - Some(f64): 合法
    /// - None: 非数值、负数、NaN/Infinity
    pub fn parse_non_negative(&self, value: &CellValue) -> Option<f64> {
        let number = match value {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };

        if number.is_finite() && number >= 0.0 {
            Some(number)
        } else {
            None
        }
    }

    /// 解析日期
    ///
    /// # 规则
    /// - 数值单元格按 Excel 日期序列号解析（必须 > 0）
    /// - 文本依次尝试 formats（日期或日期时间），最后尝试 RFC 3339
    pub fn parse_date(&self, value: &CellValue, formats: &[String]) -> Option<NaiveDate> {
        match value {
            CellValue::Number(serial) => self.excel_serial_to_datetime(*serial).map(|dt| dt.date()),
            CellValue::Text(s) => {
                let text = s.trim();
                if text.is_empty() {
                    return None;
                }

                for format in formats {
                    if let Ok(date) = NaiveDate::parse_from_str(text, format) {
                        return Some(date);
                    }
                    if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
                        return Some(dt.date());
                    }
                }

                DateTime::parse_from_rfc3339(text)
                    .ok()
                    .map(|dt| dt.date_naive())
            }
        }
    }

    /// Excel 日期序列号 → 日期时间（1900 日期系统）
    ///
    /// Excel 把 1900 视为闰年: 序列号 60 是不存在的 1900-02-29（返回 None），
    /// 小于 60 的序列号以 1899-12-31 为基准，其余以 1899-12-30 为基准
    pub fn excel_serial_to_datetime(&self, serial: f64) -> Option<NaiveDateTime> {
        if !serial.is_finite() || serial <= 0.0 || serial >= EXCEL_SERIAL_MAX {
            return None;
        }

        let days = serial.trunc() as i64;
        let seconds = (serial.fract() * 86_400.0).round() as i64;

        let base_day = match days {
            60 => return None,
            d if d < 60 => 31,
            _ => 30,
        };

        NaiveDate::from_ymd_opt(1899, 12, base_day)?
            .and_hms_opt(0, 0, 0)?
            .checked_add_signed(Duration::days(days))?
            .checked_add_signed(Duration::seconds(seconds))
    }

    /// 是否为合法的绝对 URL
    pub fn is_absolute_url(&self, value: &str) -> bool {
        Url::parse(value.trim()).is_ok()
    }
}
