//! 패키지 매니페스트 파서 -- rpm, dpkg, apk 명령 출력
//!
//! [`ManifestParser`] trait은 각 패키지 관리자 출력 형식의 파서가 구현해야 하는 인터페이스입니다.
//! [`ParserRegistry`]는 [`DistroFamily`]에서 파서로의 조회 테이블입니다.
//!
//! # 지원 형식
//!
//! - `rpm -aqi` -- [`RpmParser`]
//! - `dpkg -l` -- [`DpkgParser`]
//! - `apk -v info` -- [`ApkParser`]
//!
//! # 에러 정책
//!
//! 파서는 실패하지 않습니다. 형식에 맞지 않는 라인은 건너뛰고
//! 항상 (비어 있을 수 있는) 레코드 목록을 반환합니다.
//! 출력 순서는 입력 라인 순서를 따르며 중복 레코드도 그대로 유지합니다.

pub mod apk;
pub mod dpkg;
pub mod rpm;

pub use apk::ApkParser;
pub use dpkg::DpkgParser;
pub use rpm::RpmParser;

use dockvet_core::types::PackageRecord;

use crate::distro::DistroFamily;

/// 매니페스트 파서 trait
///
/// 패키지 관리자의 "설치된 패키지 목록" 출력 전체를 받아
/// `(product, version)` 레코드 목록을 생성합니다.
pub trait ManifestParser: Send + Sync {
    /// 이 파서가 담당하는 배포판 계열을 반환합니다.
    fn family(&self) -> DistroFamily;

    /// 매니페스트 텍스트를 파싱합니다.
    ///
    /// # Arguments
    ///
    /// - `manifest`: 목록 명령의 전체 출력 (UTF-8 문자열)
    fn parse(&self, manifest: &str) -> Vec<PackageRecord>;
}

/// 배포판 계열 -> 파서 조회 테이블
pub struct ParserRegistry {
    parsers: Vec<Box<dyn ManifestParser>>,
}

impl ParserRegistry {
    /// rpm, dpkg, apk 파서가 등록된 레지스트리를 생성합니다.
    pub fn new() -> Self {
        Self {
            parsers: vec![
                Box::new(RpmParser),
                Box::new(DpkgParser),
                Box::new(ApkParser::new()),
            ],
        }
    }

    /// 파서를 추가합니다. 같은 계열의 기존 파서는 교체됩니다.
    pub fn register(&mut self, parser: Box<dyn ManifestParser>) {
        let family = parser.family();
        self.parsers.retain(|p| p.family() != family);
        self.parsers.push(parser);
    }

    /// 계열에 해당하는 파서를 반환합니다.
    pub fn get(&self, family: DistroFamily) -> Option<&dyn ManifestParser> {
        self.parsers
            .iter()
            .find(|p| p.family() == family)
            .map(|p| p.as_ref())
    }

    /// 등록된 계열 목록
    pub fn families(&self) -> Vec<DistroFamily> {
        self.parsers.iter().map(|p| p.family()).collect()
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedParser;

    impl ManifestParser for FixedParser {
        fn family(&self) -> DistroFamily {
            DistroFamily::Alpine
        }

        fn parse(&self, _manifest: &str) -> Vec<PackageRecord> {
            vec![PackageRecord::new("fixed", "1.0")]
        }
    }

    #[test]
    fn registry_has_parser_for_each_supported_family() {
        let registry = ParserRegistry::new();
        for family in [DistroFamily::RedHat, DistroFamily::Debian, DistroFamily::Alpine] {
            let parser = registry.get(family).expect("parser should be registered");
            assert_eq!(parser.family(), family);
        }
    }

    #[test]
    fn registry_has_no_parser_for_unsupported() {
        let registry = ParserRegistry::new();
        assert!(registry.get(DistroFamily::Unsupported).is_none());
    }

    #[test]
    fn register_replaces_same_family() {
        let mut registry = ParserRegistry::new();
        registry.register(Box::new(FixedParser));

        assert_eq!(registry.families().len(), 3);
        let records = registry
            .get(DistroFamily::Alpine)
            .expect("alpine parser")
            .parse("curl-7.68.0-r5");
        assert_eq!(records, vec![PackageRecord::new("fixed", "1.0")]);
    }
}
