//! # Configuration Tests

use std::io::Write;

use m68k_fpu::{BackendKind, FpuConfig, FpuError, FpuModel, from_config};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

#[test]
fn defaults() {
    let config = FpuConfig::default();
    assert_eq!(config.model, FpuModel::Mc68881);
    assert_eq!(config.backend, BackendKind::Ieee);
    assert_eq!(config.fpcr, 0);
    assert!(!config.trace_operations);
}

#[test]
fn load_from_file() {
    let mut file = NamedTempFile::new().expect("temp file");
    write!(file, r#"{{"model": "mc68040", "backend": "extended", "fpcr": 16}}"#).expect("write");
    let config = FpuConfig::from_file(file.path()).expect("valid config");
    assert_eq!(config.model, FpuModel::Mc68040);
    assert_eq!(config.backend, BackendKind::Extended);
    let fpu = from_config(&config).expect("extended backend");
    assert_eq!(fpu.fpcr(), 0x10);
}

#[test]
fn fpcr_outside_mask_is_rejected() {
    let err = FpuConfig::from_json(r#"{"fpcr": 1}"#).expect_err("invalid");
    assert!(matches!(err, FpuError::Config(_)));
}

#[test]
fn unknown_fields_are_rejected() {
    let err = FpuConfig::from_json(r#"{"fpu": "68882"}"#).expect_err("invalid");
    assert!(matches!(err, FpuError::Json(_)));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = FpuConfig::from_file(dir.path().join("absent.json")).expect_err("missing");
    assert!(matches!(err, FpuError::Io(_)));
}
