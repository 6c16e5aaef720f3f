// ==========================================
// buy2rent 表格导入 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::importer::error::ImportResult;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager
pub trait ImportConfigReader: Send + Sync {
    /// 获取 ETA 可接受的日期格式（chrono 格式串）
    ///
    /// # 默认值
    /// - %Y-%m-%d | %Y/%m/%d | %Y%m%d | %d.%m.%Y | %m/%d/%Y | %Y-%m-%d %H:%M:%S | %Y-%m-%dT%H:%M:%S
    fn get_eta_date_formats(&self) -> ImportResult<Vec<String>>;

    /// 获取解析进度上报间隔（行）
    ///
    /// # 默认值
    /// - 50
    fn get_progress_interval_rows(&self) -> ImportResult<usize>;

    /// 获取上传文件大小上限（字节）
    ///
    /// # 默认值
    /// - 20 MiB
    fn get_max_file_bytes(&self) -> ImportResult<usize>;
}
