use cardio_annotations::{
    AnnotationError, TriggerTable, HARDWARE_TRIGGER_NAMES, SOFTWARE_TRIGGER_NAMES,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

// 清理测试文件的辅助函数
fn cleanup_test_file(path: &Path) {
    if path.exists() {
        fs::remove_file(path).ok();
    }
}

fn test_file_path(filename: &str) -> PathBuf {
    std::env::temp_dir().join(format!("cardio_annotations_{}_{}", std::process::id(), filename))
}

const SOFTWARE_INI: &str = "\
# Software triggers
[events]
sync_start = 1
sync_stop = 2
iso_start = 3
iso_stop = 4
async_start = 5
async_stop = 6
baseline_start = 7
baseline_stop = 8
pause = 9
resume = 10
sound = 11       ; pure tone
omission = 12
percussion = 13
string = 14
wind = 15
";

#[test]
fn test_software_table_from_ini() {
    let table = TriggerTable::from_ini_str(SOFTWARE_INI).unwrap();

    assert_eq!(table.len(), SOFTWARE_TRIGGER_NAMES.len());
    assert!(table.require(SOFTWARE_TRIGGER_NAMES).is_ok());
    assert_eq!(table.code("sound").unwrap(), 11);
    assert_eq!(table.name_of(9), Some("pause"));
    assert_eq!(table.name_of(99), None);

    // 硬件表所需的名字也都在软件表中，但代码空间不同
    assert!(table.require(HARDWARE_TRIGGER_NAMES).is_ok());
}

#[test]
fn test_same_code_allowed_across_tables() {
    let software = TriggerTable::new([("percussion", 1), ("string", 2), ("wind", 4)]).unwrap();
    let hardware = TriggerTable::new([("percussion", 1), ("string", 2), ("wind", 4)]).unwrap();
    assert_eq!(software, hardware);
}

#[test]
fn test_json_round_trip_through_serde() {
    let json = r#"{"percussion": 16, "string": 32, "wind": 64}"#;
    let table = TriggerTable::from_json_str(json).unwrap();
    assert_eq!(table.code("wind").unwrap(), 64);

    let serialized = serde_json::to_string(&table).unwrap();
    let map: BTreeMap<String, i32> = serde_json::from_str(&serialized).unwrap();
    assert_eq!(map.len(), 3);
    assert_eq!(map["string"], 32);
}

#[test]
fn test_json_validation() {
    let err = TriggerTable::from_json_str(r#"{"sound": 5, "omission": 5}"#).unwrap_err();
    assert!(matches!(err, AnnotationError::Json(_)));
    assert!(err.to_string().contains("Trigger code 5"));

    let err = TriggerTable::from_json_str(r#"{"sound": 0}"#).unwrap_err();
    assert!(matches!(err, AnnotationError::Json(_)));

    assert!(TriggerTable::from_json_str(r#"["sound", 5]"#).is_err());
}

#[test]
fn test_duplicate_name_rejected_in_both_formats() {
    let err = TriggerTable::from_ini_str("sound = 5\nsound = 6\n").unwrap_err();
    assert!(matches!(err, AnnotationError::DuplicateTriggerName(_)));

    // JSON 中重复的键同样是配置错误，不能以最后一个值为准
    let err = TriggerTable::from_json_str(r#"{"sound": 5, "sound": 6}"#).unwrap_err();
    assert!(matches!(err, AnnotationError::Json(_)));
    assert!(err.to_string().contains("Trigger 'sound' is defined more than once"));
}

#[test]
fn test_invalid_ini_values() {
    let err = TriggerTable::from_ini_str("sound = loud\n").unwrap_err();
    match err {
        AnnotationError::InvalidTriggerCode { name, value } => {
            assert_eq!(name, "sound");
            assert_eq!(value, "loud");
        }
        other => panic!("unexpected error: {}", other),
    }

    let err = TriggerTable::from_ini_str("= 3\n").unwrap_err();
    assert!(matches!(err, AnnotationError::InvalidFormat { line: 1, .. }));
}

#[test]
fn test_from_file_ini_and_json() {
    let ini_path = test_file_path("triggers.ini");
    let json_path = test_file_path("triggerbox.json");

    fs::write(&ini_path, SOFTWARE_INI).unwrap();
    fs::write(&json_path, r#"{"percussion": 1, "string": 2, "wind": 4}"#).unwrap();

    let software = TriggerTable::from_file(&ini_path).unwrap();
    let hardware = TriggerTable::from_file(&json_path).unwrap();

    assert!(software.require(SOFTWARE_TRIGGER_NAMES).is_ok());
    assert!(hardware.require(HARDWARE_TRIGGER_NAMES).is_ok());
    assert!(hardware.require(SOFTWARE_TRIGGER_NAMES).is_err());

    cleanup_test_file(&ini_path);
    cleanup_test_file(&json_path);
}

#[test]
fn test_from_missing_file() {
    let path = test_file_path("does_not_exist.ini");
    let err = TriggerTable::from_file(&path).unwrap_err();
    assert!(matches!(err, AnnotationError::Io(_)));
}
