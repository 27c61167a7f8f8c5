#![no_main]

use libfuzzer_sys::fuzz_target;
use dockvet_inventory::{ManifestParser, RpmParser};

fuzz_target!(|data: &[u8]| {
    let manifest = String::from_utf8_lossy(data);
    let records = RpmParser.parse(&manifest);

    // 레코드마다 Version 라인이 하나씩 필요
    let version_lines = manifest
        .lines()
        .filter(|l| l.starts_with("Version     :"))
        .count();
    assert!(records.len() <= version_lines);
    for record in &records {
        assert!(!record.version().contains(':'));
        assert!(!record.version().contains('-'));
    }
});
