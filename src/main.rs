// ==========================================
// buy2rent 表格导入 - 命令行入口
// ==========================================
// 用法:
//   buy2rent-import <sheet-file> [apartments.json] [config.json]
//
// 输出: 导入报告（JSON）写到 stdout，日志写到 stderr
// ==========================================

use anyhow::{bail, Context};
use buy2rent_import::importer::{ProductSheetImporter, SheetImporter, StaticApartmentDirectory};
use buy2rent_import::{logging, ConfigManager};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let sheet_path = match args.next() {
        Some(p) => PathBuf::from(p),
        None => bail!("用法: buy2rent-import <sheet-file> [apartments.json] [config.json]"),
    };

    let directory = match args.next() {
        Some(p) => StaticApartmentDirectory::from_json_file(&p)
            .with_context(|| format!("无法加载公寓目录: {}", p))?,
        None => {
            tracing::warn!("未提供公寓目录，所有公寓校验都将失败");
            StaticApartmentDirectory::default()
        }
    };

    let config = match args.next() {
        Some(p) => ConfigManager::from_json_file(&p)
            .with_context(|| format!("无法加载配置: {}", p))?,
        None => ConfigManager::default(),
    };

    tracing::info!("==================================================");
    tracing::info!("{}", buy2rent_import::APP_NAME);
    tracing::info!("系统版本: {}", buy2rent_import::VERSION);
    tracing::info!("配置快照: {}", config.get_config_snapshot()?);
    tracing::info!("==================================================");

    let file_name = sheet_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    let bytes = tokio::fs::read(&sheet_path)
        .await
        .with_context(|| format!("无法读取文件: {}", sheet_path.display()))?;

    let importer = ProductSheetImporter::new(directory, config);
    let task = importer.start_parse(&file_name, bytes)?;

    // 进度旁路上报
    let mut progress = task.progress.clone();
    let progress_logger = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let value = *progress.borrow_and_update();
            tracing::debug!(progress = value, "解析进度");
        }
    });

    let session = importer.finish_import(&file_name, task).await?;
    progress_logger.abort();

    let report = session.report();
    tracing::info!(
        total = report.summary.total_rows,
        valid = report.summary.valid,
        with_warnings = report.summary.with_warnings,
        invalid = report.summary.invalid,
        importable = report.summary.importable(),
        "导入校验完成"
    );

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
