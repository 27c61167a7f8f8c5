//! 배포판 판별 -- `/etc/os-release`의 `NAME=` 라인으로 패키지 관리자 계열 선택
//!
//! # 판별 규칙
//!
//! `NAME=` 라인 전체에 대해 대소문자를 구분하는 부분 문자열 매칭을 순서대로 수행합니다.
//!
//! | 포함 문자열                       | 계열                        |
//! |-----------------------------------|-----------------------------|
//! | `Red Hat`, `CentOS`, `Fedora`     | [`DistroFamily::RedHat`]    |
//! | `Debian`, `Ubuntu`                | [`DistroFamily::Debian`]    |
//! | `Alpine`                          | [`DistroFamily::Alpine`]    |
//! | 그 외, 또는 `NAME=` 라인 없음      | [`DistroFamily::Unsupported`] |

use std::fmt;

/// os-release 조회 명령
pub const OS_RELEASE_COMMAND: &[&str] = &["cat", "/etc/os-release"];

const RPM_LIST_COMMAND: &[&str] = &["rpm", "-aqi"];
const DPKG_LIST_COMMAND: &[&str] = &["dpkg", "-l"];
const APK_LIST_COMMAND: &[&str] = &["apk", "-v", "info"];

/// 패키지 관리자 계열
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DistroFamily {
    /// RPM 기반 (Red Hat, CentOS, Fedora)
    RedHat,
    /// dpkg 기반 (Debian, Ubuntu)
    Debian,
    /// apk 기반 (Alpine)
    Alpine,
    /// 지원하지 않는 배포판
    Unsupported,
}

impl fmt::Display for DistroFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedHat => write!(f, "redhat"),
            Self::Debian => write!(f, "debian"),
            Self::Alpine => write!(f, "alpine"),
            Self::Unsupported => write!(f, "unsupported"),
        }
    }
}

impl DistroFamily {
    /// `NAME=` 라인 값으로 계열을 판별합니다.
    pub fn classify(name_line: Option<&str>) -> Self {
        let Some(line) = name_line else {
            return Self::Unsupported;
        };

        if ["Red Hat", "CentOS", "Fedora"].iter().any(|n| line.contains(n)) {
            Self::RedHat
        } else if ["Debian", "Ubuntu"].iter().any(|n| line.contains(n)) {
            Self::Debian
        } else if line.contains("Alpine") {
            Self::Alpine
        } else {
            Self::Unsupported
        }
    }

    /// os-release 전체 내용으로 계열을 판별합니다.
    pub fn from_os_release(os_release: &str) -> Self {
        Self::classify(os_name_line(os_release))
    }

    /// 설치된 패키지 목록을 출력하는 명령을 반환합니다.
    pub fn listing_command(&self) -> Option<&'static [&'static str]> {
        match self {
            Self::RedHat => Some(RPM_LIST_COMMAND),
            Self::Debian => Some(DPKG_LIST_COMMAND),
            Self::Alpine => Some(APK_LIST_COMMAND),
            Self::Unsupported => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

/// os-release 내용에서 `NAME=`으로 시작하는 첫 번째 라인을 찾습니다.
pub fn os_name_line(os_release: &str) -> Option<&str> {
    os_release.lines().find(|line| line.starts_with("NAME="))
}

#[cfg(test)]
mod tests {
    use super::*;

    const UBUNTU_OS_RELEASE: &str = r#"NAME="Ubuntu"
VERSION="20.04.1 LTS (Focal Fossa)"
ID=ubuntu
ID_LIKE=debian
PRETTY_NAME="Ubuntu 20.04.1 LTS"
"#;

    const ALPINE_OS_RELEASE: &str = r#"NAME="Alpine Linux"
ID=alpine
VERSION_ID=3.12.0
PRETTY_NAME="Alpine Linux v3.12"
"#;

    #[test]
    fn classify_ubuntu_as_debian() {
        assert_eq!(
            DistroFamily::classify(Some("NAME=\"Ubuntu\"")),
            DistroFamily::Debian
        );
    }

    #[test]
    fn classify_alpine() {
        assert_eq!(
            DistroFamily::classify(Some("NAME=\"Alpine Linux\"")),
            DistroFamily::Alpine
        );
    }

    #[test]
    fn classify_suse_unsupported() {
        assert_eq!(
            DistroFamily::classify(Some("NAME=\"SUSE\"")),
            DistroFamily::Unsupported
        );
    }

    #[test]
    fn classify_redhat_family() {
        for line in [
            "NAME=\"Red Hat Enterprise Linux\"",
            "NAME=\"CentOS Linux\"",
            "NAME=Fedora",
        ] {
            assert_eq!(DistroFamily::classify(Some(line)), DistroFamily::RedHat);
        }
    }

    #[test]
    fn classify_debian() {
        assert_eq!(
            DistroFamily::classify(Some("NAME=\"Debian GNU/Linux\"")),
            DistroFamily::Debian
        );
    }

    #[test]
    fn classify_is_case_sensitive() {
        assert_eq!(
            DistroFamily::classify(Some("NAME=\"ubuntu\"")),
            DistroFamily::Unsupported
        );
    }

    #[test]
    fn classify_missing_name_line() {
        assert_eq!(DistroFamily::classify(None), DistroFamily::Unsupported);
        assert_eq!(DistroFamily::from_os_release(""), DistroFamily::Unsupported);
        assert_eq!(
            DistroFamily::from_os_release("ID=ubuntu\nVERSION_ID=20.04\n"),
            DistroFamily::Unsupported
        );
    }

    #[test]
    fn os_name_line_ignores_pretty_name() {
        let content = "PRETTY_NAME=\"Debian GNU/Linux 10\"\nNAME=\"Debian GNU/Linux\"\n";
        assert_eq!(os_name_line(content), Some("NAME=\"Debian GNU/Linux\""));
    }

    #[test]
    fn os_name_line_takes_first_match() {
        let content = "NAME=\"Alpine Linux\"\nNAME=\"Ubuntu\"\n";
        assert_eq!(os_name_line(content), Some("NAME=\"Alpine Linux\""));
    }

    #[test]
    fn from_os_release_full_files() {
        assert_eq!(
            DistroFamily::from_os_release(UBUNTU_OS_RELEASE),
            DistroFamily::Debian
        );
        assert_eq!(
            DistroFamily::from_os_release(ALPINE_OS_RELEASE),
            DistroFamily::Alpine
        );
    }

    #[test]
    fn listing_commands() {
        assert_eq!(
            DistroFamily::RedHat.listing_command(),
            Some(&["rpm", "-aqi"][..])
        );
        assert_eq!(
            DistroFamily::Debian.listing_command(),
            Some(&["dpkg", "-l"][..])
        );
        assert_eq!(
            DistroFamily::Alpine.listing_command(),
            Some(&["apk", "-v", "info"][..])
        );
        assert_eq!(DistroFamily::Unsupported.listing_command(), None);
        assert!(!DistroFamily::Unsupported.is_supported());
    }

    #[test]
    fn family_display() {
        assert_eq!(DistroFamily::RedHat.to_string(), "redhat");
        assert_eq!(DistroFamily::Alpine.to_string(), "alpine");
    }
}
