//! `dpkg -l` 출력 파서
//!
//! # `dpkg -l` 출력 예시
//!
//! ```text
//! Desired=Unknown/Install/Remove/Purge/Hold
//! | Status=Not/Inst/Conf-files/Unpacked/halF-conf/Half-inst/trig-aWait/Trig-pend
//! |/ Err?=(none)/Reinst-required (Status,Err: uppercase=bad)
//! ||/ Name           Version            Architecture Description
//! +++-==============-==================-============-=================================
//! ii  adduser        3.118ubuntu2       all          add and remove users and groups
//! ii  libc6:amd64    2.31-0ubuntu9      amd64        GNU C Library: Shared libraries
//! rc  oldpkg         1.0-1              amd64        removed, config files remain
//! ```
//!
//! `ii` 상태(설치 요청 + 설치 완료)인 라인만 레코드가 됩니다.

use dockvet_core::types::PackageRecord;

use crate::distro::DistroFamily;
use crate::parser::ManifestParser;

/// `dpkg -l` 파서
pub struct DpkgParser;

impl ManifestParser for DpkgParser {
    fn family(&self) -> DistroFamily {
        DistroFamily::Debian
    }

    fn parse(&self, manifest: &str) -> Vec<PackageRecord> {
        manifest
            .lines()
            .filter(|line| line.starts_with("ii"))
            .filter_map(|line| {
                let record = parse_installed_line(line);
                if record.is_none() {
                    tracing::trace!(line, "malformed dpkg line, skipping");
                }
                record
            })
            .collect()
    }
}

/// Parses one `ii` row: field 1 is the package, field 2 the version.
fn parse_installed_line(line: &str) -> Option<PackageRecord> {
    let mut fields = line.split_whitespace().skip(1);
    let product_token = fields.next()?;
    let version_token = fields.next()?;

    // 멀티아키 한정자 제거 (libc6:amd64 -> libc6)
    let product = match product_token.find(':') {
        Some(pos) => &product_token[..pos],
        None => product_token,
    };

    // 리비전(-0ubuntu9)을 먼저 자르고 epoch(2:)을 제거
    let version = match version_token.find('-') {
        Some(pos) => &version_token[..pos],
        None => version_token,
    };
    let version = match version.find(':') {
        Some(pos) => &version[pos + 1..],
        None => version,
    };

    Some(PackageRecord::new(product, version))
}
