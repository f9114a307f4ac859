//! 조합 에러 타입
//!
//! [`ComposeError`]는 입력 검증과 파서/필터 조합 중 발생하는 모든 에러를 표현합니다.
//! `From<ComposeError> for LogconfError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use logconf_core::error::{LogconfError, RecordError};

/// 조합 도메인 에러
///
/// 모든 에러는 단일 평가 과정에서 즉시 반환되며, 부분 결과는 만들지 않습니다.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// 레지스트리에 없는 기술 키
    #[error("unknown technology '{name}' (available: {available})")]
    UnknownTechnology {
        /// 요청된 기술 키
        name: String,
        /// 등록된 기술 키 목록 (쉼표 구분)
        available: String,
    },

    /// 사용자 정의 파서/필터가 종류별 필수 필드를 갖추지 못함
    #[error("invalid custom {kind} #{index} '{name}': {source}")]
    InvalidCustomRecord {
        /// `parser` 또는 `filter`
        kind: &'static str,
        /// 입력 목록 내 위치
        index: usize,
        /// 레코드 이름 (필터는 필터 종류)
        name: String,
        /// 검증 실패 사유
        source: RecordError,
    },

    /// 최종 파서 목록에서 이름이 중복됨
    #[error("duplicate parser name '{name}'")]
    DuplicateParserName {
        /// 중복된 파서 이름
        name: String,
    },

    /// 로그 소스 항목이 비어 있거나 잘못됨
    #[error("invalid log source #{index}: {reason}")]
    InvalidLogSource {
        /// 입력 목록 내 위치
        index: usize,
        /// 실패 사유
        reason: String,
    },

    /// 모듈 입력 필드가 잘못됨
    #[error("invalid input: {field}: {reason}")]
    InvalidInput {
        /// 필드명
        field: String,
        /// 실패 사유
        reason: String,
    },
}

impl From<ComposeError> for LogconfError {
    fn from(err: ComposeError) -> Self {
        LogconfError::Composition(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_technology_display_lists_available() {
        let err = ComposeError::UnknownTechnology {
            name: "ruby".to_owned(),
            available: "php, nginx".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("ruby"));
        assert!(msg.contains("php, nginx"));
    }

    #[test]
    fn invalid_custom_record_display_includes_reason() {
        let err = ComposeError::InvalidCustomRecord {
            kind: "parser",
            index: 2,
            name: "broken".to_owned(),
            source: RecordError::MissingField {
                kind: "regex parser".to_owned(),
                field: "regex".to_owned(),
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("#2"));
        assert!(msg.contains("broken"));
        assert!(msg.contains("regex parser requires field 'regex'"));
    }

    #[test]
    fn converts_to_logconf_error() {
        let err = ComposeError::DuplicateParserName {
            name: "json_time".to_owned(),
        };
        let top: LogconfError = err.into();
        assert!(matches!(top, LogconfError::Composition(_)));
        assert!(top.to_string().contains("json_time"));
    }
}
