//! 에러 타입 -- 도메인별 에러 정의

/// logconf 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LogconfError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 레코드 유효성 에러
    #[error("record error: {0}")]
    Record(#[from] RecordError),

    /// 파서/필터 조합 에러
    #[error("composition error: {0}")]
    Composition(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// 지원하지 않는 설정 파일 형식
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// 파서/필터 레코드 유효성 에러
///
/// `kind`는 `"regex parser"`, `"grep filter"`처럼 레코드 종류를 사람이 읽을 수 있는
/// 형태로 담습니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// 종류에 필요한 필드가 비어 있음
    #[error("{kind} requires field '{field}'")]
    MissingField { kind: String, field: String },

    /// 종류에 허용되지 않는 필드가 지정됨
    #[error("field '{field}' is not allowed for {kind}")]
    FieldNotAllowed { kind: String, field: String },

    /// 여러 필드 중 최소 하나가 필요함
    #[error("{kind} requires at least one of: {fields}")]
    MissingOneOf { kind: String, fields: String },

    /// 한 줄로 렌더링되어야 하는 값에 제어 문자가 있음
    #[error("field '{field}' of {kind} must not contain control characters")]
    ControlCharacter { kind: String, field: String },
}
