//! 기본 파서 세트
//!
//! 흔히 쓰이는 타임스탬프 필드(`time`, `datetime`, `time_local`)를 가진
//! JSON 로그용 파서입니다. 로그 소스와 무관하게 항상 출력 목록 맨 앞에 들어갑니다.

use logconf_core::types::ParserRecord;

/// ISO-8601 (소수 초 + 타임존 오프셋)
pub const ISO8601_FRACTIONAL: &str = "%Y-%m-%dT%H:%M:%S.%L%z";

/// Common Log Format 타임스탬프 (`15/Jan/2024:12:00:00 +0000`)
pub const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// 기본 파서 이름 목록 (출력 순서)
pub const DEFAULT_PARSER_NAMES: [&str; 3] = ["json_time", "json_datetime", "json_time_local"];

/// 기본 파서 세트를 반환합니다.
pub fn default_parsers() -> Vec<ParserRecord> {
    vec![
        ParserRecord::json("json_time")
            .with_time("time", ISO8601_FRACTIONAL)
            .with_time_keep(true),
        ParserRecord::json("json_datetime")
            .with_time("datetime", ISO8601_FRACTIONAL)
            .with_time_keep(true),
        ParserRecord::json("json_time_local")
            .with_time("time_local", CLF_TIME)
            .with_time_keep(true),
    ]
}
