#![no_main]

use libfuzzer_sys::fuzz_target;
use dockvet_inventory::{DpkgParser, ManifestParser};

fuzz_target!(|data: &[u8]| {
    if let Ok(manifest) = std::str::from_utf8(data) {
        let records = DpkgParser.parse(manifest);

        let installed = manifest.lines().filter(|l| l.starts_with("ii")).count();
        assert!(records.len() <= installed);
        for record in &records {
            assert!(!record.product().contains(':'));
            assert!(!record.version().contains('-'));
        }
    }
});
