// ==========================================
// buy2rent 表格导入 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、默认值回退
// 存储: 扁平 key-value（JSON 对象文件）
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::DEFAULT_PROGRESS_INTERVAL_ROWS;
use crate::importer::row_validator::DEFAULT_DATE_FORMATS;
use serde_json::json;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// 配置键
pub mod config_keys {
    pub const ETA_DATE_FORMATS: &str = "import.eta_date_formats";
    pub const PROGRESS_INTERVAL_ROWS: &str = "import.progress_interval_rows";
    pub const MAX_FILE_BYTES: &str = "import.max_file_bytes";
}

/// 日期格式列表分隔符
const FORMAT_SEPARATOR: &str = "|";

/// 默认文件大小上限: 20 MiB
pub const DEFAULT_MAX_FILE_BYTES: usize = 20 * 1024 * 1024;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    values: BTreeMap<String, String>,
}

impl ConfigManager {
    /// 从键值对创建
    pub fn from_map(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    /// 从 JSON 对象文件加载
    ///
    /// # 格式
    /// `{ "import.max_file_bytes": "1048576", ... }`，数值也可直接写数字
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ImportResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ImportError::ConfigReadError {
            key: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&raw)
    }

    /// 从 JSON 字符串加载
    pub fn from_json_str(raw: &str) -> ImportResult<Self> {
        let parsed: BTreeMap<String, serde_json::Value> = serde_json::from_str(raw)?;

        let values = parsed
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, text)
            })
            .collect::<BTreeMap<_, _>>();

        debug!(keys = values.len(), "配置加载完成");
        Ok(Self { values })
    }

    /// 读取配置值
    pub fn get_config_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|v| v.as_str())
    }

    /// 写入配置值（覆盖）
    pub fn set_config_value(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// 读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> String {
        self.get_config_value(key)
            .map(|v| v.to_string())
            .unwrap_or_else(|| default.to_string())
    }

    /// 解析正整数配置
    fn get_positive_usize(&self, key: &str, default: usize) -> ImportResult<usize> {
        let raw = self.get_config_or_default(key, &default.to_string());
        match raw.trim().parse::<usize>() {
            Ok(v) if v > 0 => Ok(v),
            _ => Err(ImportError::ConfigValueError {
                key: key.to_string(),
                value: raw,
                message: "期望正整数".to_string(),
            }),
        }
    }

    /// 获取生效配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 导入报告/日志中记录本次导入所用配置
    pub fn get_config_snapshot(&self) -> ImportResult<String> {
        let mut snapshot = serde_json::Map::new();
        snapshot.insert(
            config_keys::ETA_DATE_FORMATS.to_string(),
            json!(self.get_eta_date_formats()?),
        );
        snapshot.insert(
            config_keys::PROGRESS_INTERVAL_ROWS.to_string(),
            json!(self.get_progress_interval_rows()?),
        );
        snapshot.insert(
            config_keys::MAX_FILE_BYTES.to_string(),
            json!(self.get_max_file_bytes()?),
        );
        Ok(serde_json::Value::Object(snapshot).to_string())
    }
}

impl ImportConfigReader for ConfigManager {
    fn get_eta_date_formats(&self) -> ImportResult<Vec<String>> {
        let default = DEFAULT_DATE_FORMATS.join(FORMAT_SEPARATOR);
        let raw = self.get_config_or_default(config_keys::ETA_DATE_FORMATS, &default);

        let formats: Vec<String> = raw
            .split(FORMAT_SEPARATOR)
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .map(|f| f.to_string())
            .collect();

        if formats.is_empty() {
            return Err(ImportError::ConfigValueError {
                key: config_keys::ETA_DATE_FORMATS.to_string(),
                value: raw,
                message: "至少需要一个日期格式".to_string(),
            });
        }

        Ok(formats)
    }

    fn get_progress_interval_rows(&self) -> ImportResult<usize> {
        self.get_positive_usize(
            config_keys::PROGRESS_INTERVAL_ROWS,
            DEFAULT_PROGRESS_INTERVAL_ROWS,
        )
    }

    fn get_max_file_bytes(&self) -> ImportResult<usize> {
        self.get_positive_usize(config_keys::MAX_FILE_BYTES, DEFAULT_MAX_FILE_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConfigManager::default();

        assert_eq!(config.get_progress_interval_rows().unwrap(), 50);
        assert_eq!(config.get_max_file_bytes().unwrap(), DEFAULT_MAX_FILE_BYTES);

        let formats = config.get_eta_date_formats().unwrap();
        assert_eq!(formats.len(), DEFAULT_DATE_FORMATS.len());
        assert_eq!(formats[0], "%Y-%m-%d");
    }

    #[test]
    fn test_from_json_str_accepts_numbers_and_strings() {
        let config = ConfigManager::from_json_str(
            r#"{"import.max_file_bytes": 1024, "import.eta_date_formats": "%d/%m/%Y | %Y-%m-%d"}"#,
        )
        .unwrap();

        assert_eq!(config.get_max_file_bytes().unwrap(), 1024);
        assert_eq!(
            config.get_eta_date_formats().unwrap(),
            vec!["%d/%m/%Y".to_string(), "%Y-%m-%d".to_string()]
        );
    }

    #[test]
    fn test_invalid_values() {
        let mut config = ConfigManager::default();
        config.set_config_value(config_keys::PROGRESS_INTERVAL_ROWS, "0");
        assert!(matches!(
            config.get_progress_interval_rows(),
            Err(ImportError::ConfigValueError { .. })
        ));

        config.set_config_value(config_keys::MAX_FILE_BYTES, "lots");
        assert!(config.get_max_file_bytes().is_err());

        config.set_config_value(config_keys::ETA_DATE_FORMATS, " | ");
        assert!(config.get_eta_date_formats().is_err());
    }

    #[test]
    fn test_snapshot_contains_keys() {
        let snapshot = ConfigManager::default().get_config_snapshot().unwrap();
        assert!(snapshot.contains(config_keys::MAX_FILE_BYTES));
        assert!(snapshot.contains(config_keys::ETA_DATE_FORMATS));
    }

    #[test]
    fn test_from_json_file_missing() {
        let result = ConfigManager::from_json_file("/nonexistent/buy2rent-config.json");
        assert!(matches!(result, Err(ImportError::ConfigReadError { .. })));
    }
}
