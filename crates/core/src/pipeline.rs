//! 기술 정의 trait -- 모듈 확장 포인트 정의

use crate::types::{FilterRecord, ParserRecord};

/// 로그를 생성하는 애플리케이션 기술(php, nginx 등)의 정적 정의
///
/// 새로운 기술을 지원하려면 이 trait을 구현하여 레지스트리에 등록합니다.
/// 구현은 입력 없이 항상 같은 결과를 반환해야 합니다.
pub trait LogTechnology: Send + Sync {
    /// 기술 키 (`log_sources[].name`과 비교되는 값)
    fn key(&self) -> &str;

    /// 기술 범위 파서 목록. 컨테이너와 무관하게 기술당 한 번만 출력됩니다.
    fn parsers(&self) -> Vec<ParserRecord>;

    /// 필터 템플릿 목록
    ///
    /// match 패턴에는 [`CONTAINER_PLACEHOLDER`](crate::types::CONTAINER_PLACEHOLDER)가
    /// 들어가며, 로그 소스마다 컨테이너 이름으로 치환된 복사본이 출력됩니다.
    fn filters(&self) -> Vec<FilterRecord>;
}
