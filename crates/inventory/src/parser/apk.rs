//! `apk -v info` 출력 파서
//!
//! # `apk -v info` 출력 예시
//!
//! ```text
//! WARNING: Ignoring APKINDEX.2c4ac24e.tar.gz: No such file or directory
//! musl-1.1.24-r9
//! busybox-1.31.1-r19
//! ca-certificates-bundle-20191127-r4
//! ```
//!
//! 이름과 버전 사이에 고정 구분자가 없으므로, "숫자가 바로 뒤따르는 마지막 하이픈"을
//! 경계로 사용합니다. 이름 자체에 `-숫자` 조각이 있는 패키지(`lib32-2to3-1.0`)도
//! 이 규칙을 그대로 따릅니다.

use std::sync::LazyLock;

use regex::Regex;

use dockvet_core::types::PackageRecord;

use crate::distro::DistroFamily;
use crate::parser::ManifestParser;

/// group 1 = everything up to the last hyphen followed by a digit, group 2 = the rest.
static APK_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)-([0-9].*)$").expect("apk line pattern is valid"));

/// `apk -v info` 파서
pub struct ApkParser {
    pattern: &'static Regex,
}

impl ApkParser {
    pub fn new() -> Self {
        Self {
            pattern: &APK_LINE,
        }
    }
}

impl Default for ApkParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestParser for ApkParser {
    fn family(&self) -> DistroFamily {
        DistroFamily::Alpine
    }

    fn parse(&self, manifest: &str) -> Vec<PackageRecord> {
        let mut records = Vec::new();

        for line in manifest.lines() {
            let Some(caps) = self.pattern.captures(line) else {
                tracing::trace!(line, "apk line without version, skipping");
                continue;
            };
            let (Some(product), Some(rest)) = (caps.get(1), caps.get(2)) else {
                continue;
            };

            // 릴리스 빌드 번호(-r5) 제거
            let rest = rest.as_str();
            let version = match rest.find('-') {
                Some(pos) => &rest[..pos],
                None => rest,
            };
            records.push(PackageRecord::new(product.as_str(), version));
        }

        records
    }
}
