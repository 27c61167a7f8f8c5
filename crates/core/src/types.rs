//! 도메인 타입 -- 크레이트 전역에서 사용되는 공통 타입
//!
//! 패키지 레코드, 평가 결과, 스캔 리포트 등 모든 크레이트가 공유하는
//! 데이터 구조를 정의합니다. 불변식은 생성자에서 강제됩니다.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 정규화된 `(product, version)` 패키지 레코드
///
/// 버전 문자열에서 epoch 접두사(`2:`)와 하이픈 뒤의 릴리스 접미사(`-4ubuntu1`)는
/// 생성 시점에 제거됩니다. 따라서 `version()`에는 `:`와 `-`가 포함되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawPackageRecord")]
pub struct PackageRecord {
    product: String,
    version: String,
}

#[derive(Deserialize)]
struct RawPackageRecord {
    product: String,
    version: String,
}

impl From<RawPackageRecord> for PackageRecord {
    fn from(raw: RawPackageRecord) -> Self {
        Self::new(raw.product, raw.version)
    }
}

impl PackageRecord {
    /// 버전을 정규화하여 레코드를 생성합니다.
    ///
    /// 첫 번째 `-`에서 자른 뒤, 남은 문자열에 `:`가 있으면 첫 번째 `:`까지 버립니다.
    pub fn new(product: impl Into<String>, version: impl AsRef<str>) -> Self {
        Self {
            product: product.into(),
            version: normalize_version(version.as_ref()).to_owned(),
        }
    }

    /// 패키지 이름
    pub fn product(&self) -> &str {
        &self.product
    }

    /// 정규화된 버전
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for PackageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.product, self.version)
    }
}

/// Strips the release suffix, then the epoch prefix.
fn normalize_version(raw: &str) -> &str {
    let without_release = match raw.find('-') {
        Some(pos) => &raw[..pos],
        None => raw,
    };
    match without_release.find(':') {
        Some(pos) => &without_release[pos + 1..],
        None => without_release,
    }
}

/// 패키지 취약 여부
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PackageStatus {
    /// 알려진 취약점 없음
    Ok,
    /// 하나 이상의 취약점과 일치
    Vuln,
}

impl fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "OK"),
            Self::Vuln => write!(f, "VULN"),
        }
    }
}

/// 취약점 DB 조회 결과가 붙은 패키지 레코드
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatedPackage {
    product: String,
    version: String,
    status: PackageStatus,
}

impl EvaluatedPackage {
    /// 레코드와 상태로 평가 결과를 생성합니다.
    pub fn new(record: PackageRecord, status: PackageStatus) -> Self {
        Self {
            product: record.product,
            version: record.version,
            status,
        }
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn status(&self) -> PackageStatus {
        self.status
    }

    pub fn is_vulnerable(&self) -> bool {
        self.status == PackageStatus::Vuln
    }
}

/// 스캔 리포트
///
/// 이미지 하나에 대한 스캔 결과입니다. 카운트 필드는 생성자에서
/// `evaluated_packages_info`로부터 계산되므로
/// `total_products == vuln_products + ok_products == evaluated_packages_info.len()`
/// 이 항상 성립합니다. 생성 이후에는 변경할 수 없습니다.
///
/// 직렬화 시 `timestamp`는 Unix epoch 초 단위 실수로 기록됩니다 (이력 저장 형식).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ScanReportFields")]
pub struct ScanReport {
    image_name: String,
    #[serde(with = "epoch_seconds")]
    timestamp: DateTime<Utc>,
    evaluated_packages_info: Vec<EvaluatedPackage>,
    total_products: usize,
    vuln_products: usize,
    ok_products: usize,
}

/// 역직렬화용 필드 (카운트는 다시 계산)
#[derive(Deserialize)]
struct ScanReportFields {
    image_name: String,
    #[serde(with = "epoch_seconds")]
    timestamp: DateTime<Utc>,
    evaluated_packages_info: Vec<EvaluatedPackage>,
}

impl From<ScanReportFields> for ScanReport {
    fn from(fields: ScanReportFields) -> Self {
        Self::new(
            fields.image_name,
            fields.timestamp,
            fields.evaluated_packages_info,
        )
    }
}

impl ScanReport {
    /// 평가된 패키지 목록으로 리포트를 조립합니다.
    pub fn new(
        image_name: impl Into<String>,
        timestamp: DateTime<Utc>,
        evaluated_packages_info: Vec<EvaluatedPackage>,
    ) -> Self {
        let total_products = evaluated_packages_info.len();
        let vuln_products = evaluated_packages_info
            .iter()
            .filter(|p| p.is_vulnerable())
            .count();
        Self {
            image_name: image_name.into(),
            timestamp,
            evaluated_packages_info,
            total_products,
            vuln_products,
            ok_products: total_products - vuln_products,
        }
    }

    pub fn image_name(&self) -> &str {
        &self.image_name
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn evaluated_packages(&self) -> &[EvaluatedPackage] {
        &self.evaluated_packages_info
    }

    pub fn total_products(&self) -> usize {
        self.total_products
    }

    pub fn vuln_products(&self) -> usize {
        self.vuln_products
    }

    pub fn ok_products(&self) -> usize {
        self.ok_products
    }
}

impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ScanReport({}, total={}, vuln={}, ok={})",
            self.image_name, self.total_products, self.vuln_products, self.ok_products,
        )
    }
}

/// 저장소가 ID를 부여한 스캔 리포트
///
/// `id`는 저장소 내부 식별자이며 출력에는 포함되지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredReport {
    /// 저장소 부여 ID
    pub id: String,
    /// 저장된 리포트
    pub report: ScanReport,
}

/// 컨테이너 정보
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerInfo {
    /// 컨테이너 ID
    pub id: String,
    /// 컨테이너가 생성된 이미지 이름
    pub image: String,
}

impl fmt::Display for ContainerInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.id, self.image)
    }
}

/// `DateTime<Utc>` <-> Unix epoch 초 (마이크로초 정밀도 실수)
pub mod epoch_seconds {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(ts.timestamp_micros() as f64 / 1_000_000.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        if !secs.is_finite() {
            return Err(serde::de::Error::custom("timestamp must be a finite number"));
        }
        let micros = (secs * 1_000_000.0).round() as i64;
        DateTime::from_timestamp_micros(micros)
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {secs}")))
    }
}
