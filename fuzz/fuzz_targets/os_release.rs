#![no_main]

use libfuzzer_sys::fuzz_target;
use dockvet_inventory::{DistroFamily, os_name_line};

fuzz_target!(|data: &[u8]| {
    let content = String::from_utf8_lossy(data);
    let family = DistroFamily::from_os_release(&content);

    match os_name_line(&content) {
        Some(line) => assert!(line.starts_with("NAME=")),
        None => assert_eq!(family, DistroFamily::Unsupported),
    }
    assert_eq!(family.listing_command().is_some(), family.is_supported());
});
