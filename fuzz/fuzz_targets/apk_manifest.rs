#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use dockvet_inventory::{ApkParser, ManifestParser};

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// 원시 매니페스트 텍스트
    raw: String,
    /// `{name}-{version}-r{release}` 형태로 조립할 라인들 (최대 16개)
    lines: Vec<(String, u16, u8)>,
}

fuzz_target!(|input: FuzzInput| {
    let parser = ApkParser::new();

    let raw_records = parser.parse(&input.raw);
    assert!(raw_records.len() <= input.raw.lines().count());

    let mut manifest = String::new();
    for (name, major, release) in input.lines.iter().take(16) {
        // 줄바꿈이 섞이면 라인 수가 달라짐
        let name: String = name.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        manifest.push_str(&format!("{name}-{major}.0-r{release}\n"));
    }
    let records = parser.parse(&manifest);
    assert_eq!(records.len(), input.lines.len().min(16));
    for record in &records {
        assert!(!record.version().contains('-'));
    }
});
