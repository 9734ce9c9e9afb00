use sheetql_core::{
    escape_literal, format_value, generate_ids, generate_update_sql, perform_vlookup,
    quote_identifier, validate, validate_id_config, DuplicateInfo, IdErrorKind, UpdateConfig,
    VlookupMapping,
};
use sheetql_sheet::CellValue;

fn rows(data: &[&[&str]]) -> Vec<Vec<CellValue>> {
    data.iter()
        .map(|r| r.iter().map(|c| CellValue::from(*c)).collect())
        .collect()
}

#[test]
fn test_id_generation_example() {
    assert_eq!(
        generate_ids("ID-", 10, 1, 3).unwrap(),
        vec!["ID-0000001", "ID-0000002", "ID-0000003"]
    );
}

#[test]
fn test_id_overflow_example() {
    let err = validate_id_config("ID-", 5, 1, 200).unwrap_err();
    assert_eq!(err.kind(), IdErrorKind::Overflow);
    assert_eq!(
        err.to_string(),
        "Cannot generate 200 IDs starting from 1. Maximum value for 2 digits is 99."
    );
}

#[test]
fn test_generated_ids_keep_width() {
    for start in [0, 1, 9, 10, 99, 500] {
        for count in [0, 1, 5, 400] {
            if validate_id_config("AB-", 7, start, count).is_err() {
                continue;
            }
            for id in generate_ids("AB-", 7, start, count).unwrap() {
                assert_eq!(id.len(), 7, "{id}");
                assert!(id.starts_with("AB-"));
            }
        }
    }
}

#[test]
fn test_duplicate_detection_example() {
    let result = validate(&["A", "B", "A", ""]);

    assert!(result.has_duplicates);
    assert_eq!(
        result.duplicates,
        vec![DuplicateInfo {
            value: "A".to_string(),
            rows: vec![2, 4],
        }]
    );
    assert!(result.has_empty_pks);
    assert_eq!(result.empty_pk_rows, vec![5]);
}

#[test]
fn test_vlookup_match_example() {
    let out = perform_vlookup(
        &rows(&[&["x"], &["y"]]),
        0,
        &rows(&[&["x", "1"], &["z", "2"]]),
        0,
        &[VlookupMapping::new(1, 0)],
    );

    assert!(out.results[0].matched);
    assert_eq!(out.results[0].values, vec!["1"]);
    assert!(!out.results[1].matched);
    assert_eq!(out.results[1].values, vec![""]);
    assert_eq!(
        (out.match_count, out.no_match_count, out.duplicate_keys_in_reference),
        (1, 1, 0)
    );
}

#[test]
fn test_reference_duplicate_key_example() {
    let out = perform_vlookup(
        &rows(&[&["k"], &["k"]]),
        0,
        &rows(&[&["k", "1"], &["k", "2"]]),
        0,
        &[VlookupMapping::new(1, 1)],
    );
    assert!(out.results.iter().all(|r| r.values == vec!["1"]));
    assert_eq!(out.duplicate_keys_in_reference, 1);
}

#[test]
fn test_escaping_examples() {
    assert_eq!(escape_literal("O'Brien"), "O''Brien");
    assert_eq!(format_value(&CellValue::Null, true), "NULL");
    assert_eq!(format_value(&CellValue::from(""), true), "NULL");
    assert_eq!(format_value(&CellValue::from(""), false), "''");
    assert_eq!(quote_identifier("my_table"), "my_table");
    assert_eq!(quote_identifier("My Table"), "\"My Table\"");
}

#[test]
fn test_update_with_no_effective_set_columns() {
    let headers = vec!["id".to_string(), "name".to_string()];
    let data = rows(&[&["1", "a"], &["2", "b"]]);
    let config = UpdateConfig {
        pk_column: 1,
        set_columns: vec![1],
        ..Default::default()
    };
    assert!(generate_update_sql(&config, &headers, &data).is_empty());
}

#[test]
fn test_functions_are_idempotent() {
    let lookup = rows(&[&["a"], &[""], &["c"]]);
    let reference = rows(&[&["c", "3"], &["a", "1"], &["a", "2"]]);
    let mappings = [VlookupMapping::new(1, 1)];
    assert_eq!(
        perform_vlookup(&lookup, 0, &reference, 0, &mappings),
        perform_vlookup(&lookup, 0, &reference, 0, &mappings)
    );

    let keys = ["b", "a", "b", " ", "a"];
    assert_eq!(validate(&keys), validate(&keys));
}
