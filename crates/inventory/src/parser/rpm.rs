//! `rpm -aqi` 출력 파서
//!
//! [`RpmParser`]는 패키지마다 출력되는 고정폭 필드 블록에서
//! `Name` / `Version` 필드만 사용합니다.
//!
//! # `rpm -aqi` 출력 예시
//!
//! ```text
//! Name        : bash
//! Version     : 5.0.17
//! Release     : 1.fc32
//! Architecture: x86_64
//! ...
//! ```

use dockvet_core::types::PackageRecord;

use crate::distro::DistroFamily;
use crate::parser::ManifestParser;

const NAME_LABEL: &str = "Name        :";
const VERSION_LABEL: &str = "Version     :";

/// `rpm -aqi` 파서
///
/// `Name` 라인은 대기 중인 패키지 이름이 되고, 다음 `Version` 라인과 짝을 이뤄
/// 레코드를 만듭니다. 짝이 없는 마지막 `Name`은 버려집니다.
pub struct RpmParser;

impl ManifestParser for RpmParser {
    fn family(&self) -> DistroFamily {
        DistroFamily::RedHat
    }

    fn parse(&self, manifest: &str) -> Vec<PackageRecord> {
        let mut records = Vec::new();
        let mut pending: Option<&str> = None;

        for line in manifest.lines() {
            if let Some(rest) = line.strip_prefix(NAME_LABEL) {
                // Version 없이 Name이 다시 나오면 이전 Name은 버림
                pending = Some(field_value(rest));
            } else if let Some(rest) = line.strip_prefix(VERSION_LABEL) {
                match pending.take() {
                    Some(product) => records.push(PackageRecord::new(product, field_value(rest))),
                    None => tracing::trace!(line, "rpm Version line without Name, skipping"),
                }
            }
        }

        if let Some(product) = pending {
            tracing::trace!(product, "rpm Name line without Version at end of manifest");
        }

        records
    }
}

/// Value after the label, up to the next `:`, trimmed.
fn field_value(rest: &str) -> &str {
    rest.split(':').next().unwrap_or_default().trim()
}
