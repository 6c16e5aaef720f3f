// ==========================================
// buy2rent 表格导入 - 导入 Trait
// ==========================================
// 职责: 定义导入接口（不包含实现）
// ==========================================

use crate::domain::{ApartmentRef, ParsedSheet};
use crate::importer::error::ImportResult;
use crate::importer::file_parser::ParseTask;
use crate::importer::sheet_importer_impl::ImportSession;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// SheetImporter Trait
// ==========================================
// 用途: 表格导入主接口
// 实现者: ProductSheetImporter
#[async_trait]
pub trait SheetImporter: Send + Sync {
    /// 启动后台解析
    ///
    /// # 参数
    /// - file_name: 文件名（用于选择解析器）
    /// - bytes: 文件内容
    ///
    /// # 返回
    /// - Ok(ParseTask): 解析任务（含进度通道）
    /// - Err: 格式不支持、文件过大、配置错误
    fn start_parse(&self, file_name: &str, bytes: Vec<u8>) -> ImportResult<ParseTask>;

    /// 导入文件内容，生成待复核的导入会话
    ///
    /// 等价于 start_parse + finish_import
    async fn import_bytes(&self, file_name: &str, bytes: Vec<u8>) -> ImportResult<ImportSession>;

    /// 等待解析任务完成并生成导入会话
    ///
    /// # 导入流程
    /// 1. 文件解析结果（第一个工作表）
    /// 2. 列自动映射
    /// 3. 读取公寓目录
    /// 4. 生成 ImportSession（校验在会话内按需计算）
    async fn finish_import(&self, file_name: &str, task: ParseTask) -> ImportResult<ImportSession>;

    /// 从磁盘文件导入
    async fn import_file(&self, path: &Path) -> ImportResult<ImportSession>;
}

// ==========================================
// SheetParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: ExcelParser, CsvParser
pub trait SheetParser: Send + Sync {
    /// 解析文件字节为表头 + 数据行
    ///
    /// # 参数
    /// - bytes: 文件内容
    /// - progress: 进度回调（0..=100，单调递增）
    ///
    /// # 返回
    /// - Ok(ParsedSheet): 解析结果
    /// - Err(EmptySheet): 工作表没有任何行
    /// - Err: 格式错误
    fn parse_bytes(
        &self,
        bytes: &[u8],
        progress: &mut dyn FnMut(u8),
    ) -> ImportResult<ParsedSheet>;
}

// ==========================================
// ApartmentDirectory Trait
// ==========================================
// 用途: 公寓目录（外部数据层提供，只读）
// 实现者: StaticApartmentDirectory
#[async_trait]
pub trait ApartmentDirectory: Send + Sync {
    /// 列出全部公寓
    async fn list_apartments(&self) -> ImportResult<Vec<ApartmentRef>>;
}
