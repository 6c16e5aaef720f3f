// ==========================================
// 表格导入集成测试
// ==========================================
// 测试目标: 文件 → 列映射 → 行校验 → 可提交记录 全流程
// ==========================================


use buy2rent_import::importer::StaticApartmentDirectory;
use buy2rent_import::*;
use chrono::NaiveDate;

#[tokio::test]
async fn test_import_normal_products() {
    logging::init_test();

    let importer = test_helpers::create_test_importer();
    let session = importer
        .import_file(&test_helpers::dataset_path("01_normal_products.csv"))
        .await
        .expect("导入应该成功");

    assert_eq!(session.file_name(), "01_normal_products.csv");
    assert_eq!(session.sheet().headers.len(), 11);
    assert_eq!(session.sheet().rows.len(), 4);

    // 自动映射
    let mapping = session.mapping();
    assert_eq!(mapping.len(), session.sheet().headers.len());
    assert_eq!(
        mapping.target_of("Brand"),
        Some(MappedField::Field(ImportField::Vendor))
    );
    assert_eq!(
        mapping.target_of("Unit Price"),
        Some(MappedField::Field(ImportField::UnitPrice))
    );
    assert_eq!(
        mapping.target_of("Quantity"),
        Some(MappedField::Field(ImportField::Qty))
    );
    assert_eq!(
        mapping.target_of("ETA"),
        Some(MappedField::Field(ImportField::Eta))
    );

    let report = session.report();
    println!("导入汇总: {:?}", report.summary);
    assert_eq!(report.summary.total_rows, 4);
    assert_eq!(report.summary.valid, 4);
    assert_eq!(report.summary.invalid, 0);

    let records = session.importable_records();
    assert_eq!(records.len(), 4);

    let table = &records[0];
    assert_eq!(table.row_number, 2);
    assert_eq!(table.apartment_id, "apt-1");
    assert_eq!(table.product, "Oak Dining Table");
    assert_eq!(table.vendor, "IKEA");
    assert_eq!(table.unit_price, 199.9);
    assert_eq!(table.qty, 1.0);
    assert_eq!(table.room.as_deref(), Some("Dining"));
    assert_eq!(table.category.as_deref(), Some("Furniture"));
    assert_eq!(table.eta, NaiveDate::from_ymd_opt(2025, 3, 1));
    assert_eq!(table.notes, None);

    assert_eq!(records[1].notes.as_deref(), Some("Black"));
    assert_eq!(records[1].eta, None);

    // 名称大小写不敏感 / 按 id 精确匹配
    assert_eq!(records[2].apartment_id, "apt-2");
    assert_eq!(records[2].eta, NaiveDate::from_ymd_opt(2025, 4, 1));
    assert_eq!(records[3].apartment_id, "apt-3");
}

#[tokio::test]
async fn test_import_mixed_quality() {
    logging::init_test();

    let importer = test_helpers::create_test_importer();
    let session = importer
        .import_file(&test_helpers::dataset_path("02_mixed_quality.csv"))
        .await
        .expect("导入应该成功");

    // 空列头列不出现在表头中
    assert_eq!(
        session.sheet().headers,
        vec!["Apartment", "Product", "Vendor", "Link", "SKU", "Price", "Qty", "Internal"]
    );
    assert!(session
        .sheet()
        .rows
        .iter()
        .all(|row| row.cells.keys().all(|k| !k.trim().is_empty())));

    // 全空行与仅空列头列有内容的行被丢弃
    let row_numbers: Vec<usize> = session.sheet().rows.iter().map(|r| r.row_number).collect();
    assert_eq!(row_numbers, vec![2, 4, 5, 6, 8]);

    assert_eq!(
        session.mapping().target_of("Internal"),
        Some(MappedField::Skip)
    );

    let report = session.report();
    assert_eq!(report.summary.total_rows, 5);
    assert_eq!(report.summary.valid, 1);
    assert_eq!(report.summary.with_warnings, 2);
    assert_eq!(report.summary.invalid, 2);
    assert_eq!(report.summary.importable(), 3);

    let rows = &report.rows;
    assert_eq!(rows[0].outcome.verdict(), RowVerdict::Valid);

    assert!(rows[1].outcome.valid);
    assert_eq!(
        rows[1].outcome.warnings,
        vec!["Quantity is 0".to_string(), "Invalid URL format".to_string()]
    );

    assert!(!rows[2].outcome.valid);
    assert_eq!(
        rows[2].outcome.errors,
        vec!["Apartment not found".to_string(), "Invalid unit price".to_string()]
    );

    assert_eq!(rows[3].outcome.errors, vec!["Missing sku".to_string()]);

    assert!(rows[4].outcome.valid);
    assert_eq!(rows[4].outcome.warnings, vec!["Price is 0".to_string()]);

    let records = session.importable_records();
    let imported: Vec<usize> = records.iter().map(|r| r.row_number).collect();
    assert_eq!(imported, vec![2, 4, 8]);
}

#[tokio::test]
async fn test_header_only_sheet() {
    let importer = test_helpers::create_test_importer();
    let session = importer
        .import_file(&test_helpers::dataset_path("03_header_only.csv"))
        .await
        .expect("只有表头的文件应该导入成功");

    assert_eq!(session.sheet().headers.len(), 3);
    assert!(session.sheet().rows.is_empty());

    let report = session.report();
    assert_eq!(report.summary.total_rows, 0);
    assert!(session.importable_records().is_empty());
}

#[tokio::test]
async fn test_empty_file_fails() {
    let importer = test_helpers::create_test_importer();
    let result = importer.import_bytes("empty.csv", Vec::new()).await;

    assert!(matches!(result, Err(ImportError::EmptySheet)));
}

#[tokio::test]
async fn test_import_workbook_first_sheet() {
    logging::init_test();

    let importer = test_helpers::create_test_importer();
    let session = importer
        .import_file(&test_helpers::dataset_path("04_two_sheets.xlsx"))
        .await
        .expect("工作簿导入应该成功");

    // 第二个工作表 (Archive) 被忽略
    assert_eq!(session.sheet().headers.len(), 8);
    assert!(session
        .sheet()
        .headers
        .iter()
        .all(|h| h != "Legacy Header" && h != "Other"));
    assert_eq!(session.sheet().rows.len(), 2);

    let report = session.report();
    assert_eq!(report.summary.valid, 2);

    let records = session.importable_records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].apartment_id, "apt-1");
    assert_eq!(records[0].unit_price, 199.0);
    assert_eq!(records[0].eta, NaiveDate::from_ymd_opt(2025, 3, 1));
    assert_eq!(records[1].row_number, 4);
    assert_eq!(records[1].unit_price, 49.5);
}

#[tokio::test]
async fn test_corrupt_excel_fails() {
    let file = test_helpers::write_temp_file(".xlsx", b"this is not a workbook").unwrap();
    let importer = test_helpers::create_test_importer();

    let result = importer.import_file(file.path()).await;
    assert!(matches!(result, Err(ImportError::ExcelParseError(_))));
}

#[tokio::test]
async fn test_mapping_override_changes_verdicts() {
    let importer = test_helpers::create_test_importer();
    let mut session = importer
        .import_file(&test_helpers::dataset_path("02_mixed_quality.csv"))
        .await
        .unwrap();

    // "Internal" 列只有第 2 行有值: 改映射为 sku 后，第 6 行仍缺 sku
    session.override_mapping("SKU", MappedField::Skip).unwrap();
    session
        .override_mapping("Internal", MappedField::Field(ImportField::Sku))
        .unwrap();

    let rows = session.validate_rows();
    assert!(rows[0].outcome.valid);
    assert!(rows
        .iter()
        .skip(1)
        .all(|r| r.outcome.errors.contains(&"Missing sku".to_string())));
}

#[tokio::test]
async fn test_validation_is_idempotent() {
    let importer = test_helpers::create_test_importer();
    let session = importer
        .import_file(&test_helpers::dataset_path("02_mixed_quality.csv"))
        .await
        .unwrap();

    let first = serde_json::to_string(&session.validate_rows()).unwrap();
    let second = serde_json::to_string(&session.validate_rows()).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_report_json_shape() {
    let importer = test_helpers::create_test_importer();
    let session = importer
        .import_file(&test_helpers::dataset_path("02_mixed_quality.csv"))
        .await
        .unwrap();

    let json = serde_json::to_value(session.report()).unwrap();
    let mapping = json["mapping"].as_array().unwrap();
    assert_eq!(mapping.len(), 8);
    assert_eq!(mapping[3]["header"], "Link");
    assert_eq!(mapping[3]["target"], "vendorLink");
    assert_eq!(mapping[7]["target"], "skip");

    let record = serde_json::to_value(&session.importable_records()[0]).unwrap();
    assert_eq!(record["apartmentId"], "apt-1");
    assert_eq!(record["vendorLink"], "https://bolia.com/sofa");
    assert_eq!(record["unitPrice"], 1200.0);
}

#[tokio::test]
async fn test_apartment_directory_from_file() {
    let directory =
        StaticApartmentDirectory::from_json_file(test_helpers::dataset_path("apartments.json"))
            .unwrap();
    let importer = ProductSheetImporter::new(directory, ConfigManager::default());

    let session = importer
        .import_file(&test_helpers::dataset_path("01_normal_products.csv"))
        .await
        .unwrap();
    assert_eq!(session.apartments().len(), 3);
    assert_eq!(session.report().summary.valid, 4);
}

#[tokio::test]
async fn test_missing_apartment_directory_file() {
    let result = StaticApartmentDirectory::from_json_file("/nonexistent/apartments.json");
    assert!(matches!(result, Err(ImportError::ApartmentDirectoryError(_))));
}
