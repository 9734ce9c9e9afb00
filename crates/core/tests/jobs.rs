use sheetql_core::{
    run_insert, run_update, run_vlookup, with_generated_ids, IdMode, InsertConfig, RowFinding,
    UpdateConfig, VlookupJob, VlookupMapping,
};
use sheetql_sheet::Book;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_csv_to_insert_script() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("customers.csv");
    fs::write(
        &path,
        "customer_id,Full Name,city\nC1,O'Brien,Dublin\nC2,,Paris\nC1,Ann,\n,Bob,Rome\n",
    )
    .unwrap();

    let book = Book::open(&path).unwrap();
    let sheet = book.first_sheet().unwrap();
    let config = InsertConfig {
        table_name: "customers".to_string(),
        include_column_names: true,
        treat_empty_as_null: true,
        ..Default::default()
    };
    let out = run_insert(&config, sheet).unwrap();

    assert_eq!(
        out.statements[0],
        "INSERT INTO customers (customer_id, \"Full Name\", city) VALUES ('C1', 'O''Brien', 'Dublin');"
    );
    assert_eq!(
        out.statements[1],
        "INSERT INTO customers (customer_id, \"Full Name\", city) VALUES ('C2', NULL, 'Paris');"
    );
    assert!(!out.is_exportable());
    assert_eq!(out.validation.duplicates[0].rows, vec![2, 4]);
    assert_eq!(out.validation.empty_pk_rows, vec![5]);

    let flagged = out.validation.flagged_rows();
    assert_eq!(flagged.get(&3), Some(&RowFinding::EmptyPk));
    assert!(matches!(flagged.get(&0), Some(RowFinding::Duplicate { .. })));
    assert!(flagged.get(&1).is_none());
}

#[test]
fn test_generated_ids_replace_bad_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("customers.csv");
    fs::write(&path, "id,name\nX,a\nX,b\n,c\n").unwrap();

    let book = Book::open(&path).unwrap();
    let sheet = book.first_sheet().unwrap();
    let config = InsertConfig {
        id_mode: IdMode::Generate,
        id_prefix: "CUS".to_string(),
        id_total_length: 6,
        id_start_number: 10,
        ..Default::default()
    };
    let out = run_insert(&config, sheet).unwrap();

    assert!(out.is_exportable());
    assert_eq!(
        out.script(),
        "INSERT INTO my_table VALUES ('CUS010', 'a');\n\
         INSERT INTO my_table VALUES ('CUS011', 'b');\n\
         INSERT INTO my_table VALUES ('CUS012', 'c');"
    );

    let ids = out.generated_ids.unwrap();
    let updated = with_generated_ids(sheet, 0, &ids);
    assert_eq!(updated.column_keys(0), vec!["CUS010", "CUS011", "CUS012"]);
}

#[test]
fn test_update_from_tsv() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("prices.tsv");
    fs::write(&path, "sku\tprice\tnote\nA-1\t9.5\t\nB-2\t12\tit's new\n").unwrap();

    let book = Book::open(&path).unwrap();
    let config = UpdateConfig {
        table_name: "Price List".to_string(),
        pk_column: 0,
        set_columns: vec![2, 1, 0],
        treat_empty_as_null: true,
    };
    let out = run_update(&config, book.get_sheet("prices").unwrap()).unwrap();

    assert_eq!(
        out.statements,
        vec![
            "UPDATE \"Price List\" SET note = NULL, price = '9.5' WHERE sku = 'A-1';",
            "UPDATE \"Price List\" SET note = 'it''s new', price = '12' WHERE sku = 'B-2';",
        ]
    );
}

#[test]
fn test_vlookup_between_workbook_sheets() {
    let dir = tempdir().unwrap();
    let orders = dir.path().join("orders.csv");
    let customers = dir.path().join("customers.csv");
    fs::write(&orders, "order,customer\nO1,C2\nO2,C1\nO3,\nO4,C9\n").unwrap();
    fs::write(&customers, "id,name,tier\nC1,Alice,gold\nC2,Bob,silver\nC2,Bobby,bronze\n").unwrap();

    let mut book = Book::new();
    book.add_sheet("Orders", Book::open(&orders).unwrap().first_sheet().unwrap().clone())
        .unwrap();
    book.add_sheet(
        "Customers",
        Book::open(&customers).unwrap().first_sheet().unwrap().clone(),
    )
    .unwrap();

    let job = VlookupJob {
        lookup_sheet: "Orders".to_string(),
        lookup_column: Some(1),
        reference_sheet: "Customers".to_string(),
        match_column: Some(0),
        target_sheet: "Orders".to_string(),
        return_mappings: vec![
            VlookupMapping::new(1, 2).with_column_name("Customer").into(),
            VlookupMapping::new(2, 3).into(),
        ],
    };
    let out = run_vlookup(&job, &book).unwrap();

    assert_eq!(out.output.match_count, 2);
    assert_eq!(out.output.no_match_count, 2);
    assert_eq!(out.output.duplicate_keys_in_reference, 1);
    assert_eq!(out.output.unmatched_rows(), vec![4, 5]);
    assert_eq!(
        out.result.headers(),
        &["order", "customer", "Customer", "Column D"]
    );
    assert_eq!(out.result.cell(0, 2).as_str(), "Bob");
    assert_eq!(out.result.cell(0, 3).as_str(), "silver");
    assert_eq!(out.result.cell(2, 2).as_str(), "");

    let path = dir.path().join("result.xlsx");
    let updated = out.into_book(&book).unwrap();
    updated.save_as_xlsx(&path).unwrap();

    let reloaded = Book::open(&path).unwrap();
    assert_eq!(reloaded.sheet_names(), vec!["Orders", "Customers"]);
    let sheet = reloaded.get_sheet("Orders").unwrap();
    assert_eq!(sheet.cell(1, 2).as_str(), "Alice");
    assert_eq!(sheet.cell(1, 3).as_str(), "gold");
}
