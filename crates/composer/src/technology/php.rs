//! PHP 기술 정의
//!
//! Monolog JSON 로그(타임스탬프 변형 4종)와 PHP 에러 로그를 다룹니다.
//!
//! | 파서 | `datetime` 예시 |
//! |---|---|
//! | `php_monolog_json_tz_colon` | `2024-01-15T12:00:00+01:00` |
//! | `php_monolog_json_tz` | `2024-01-15T12:00:00+0100` |
//! | `php_monolog_json_utc` | `2024-01-15T12:00:00Z` |
//! | `php_monolog_json_micro` | `2024-01-15T12:00:00.123456+00:00` |

use logconf_core::pipeline::LogTechnology;
use logconf_core::types::{FilterRecord, GrepFilter, NestFilter, NestOperation, ParserRecord};

use super::{log_source_tag, parse_log};
use crate::pattern::DEFAULT_MATCH_TEMPLATE;

/// PHP 에러 로그 (`[15-Jan-2024 12:00:00 UTC] PHP Fatal error:  ...`)
pub const PHP_ERROR_REGEX: &str =
    r"^\[(?<time>[^\]]+)\] PHP (?<level>[A-Za-z ]+):\s+(?<message>.*)$";

/// PHP 기술
pub struct PhpTechnology;

impl LogTechnology for PhpTechnology {
    fn key(&self) -> &str {
        "php"
    }

    fn parsers(&self) -> Vec<ParserRecord> {
        vec![
            ParserRecord::json("php_monolog_json_tz_colon")
                .with_time("datetime", "%Y-%m-%dT%H:%M:%S%:z")
                .with_time_keep(true),
            ParserRecord::json("php_monolog_json_tz")
                .with_time("datetime", "%Y-%m-%dT%H:%M:%S%z")
                .with_time_keep(true),
            ParserRecord::json("php_monolog_json_utc")
                .with_time("datetime", "%Y-%m-%dT%H:%M:%SZ")
                .with_time_keep(true),
            ParserRecord::json("php_monolog_json_micro")
                .with_time("datetime", "%Y-%m-%dT%H:%M:%S.%L%z")
                .with_time_keep(true),
            ParserRecord::regex("php_error", PHP_ERROR_REGEX)
                .with_time("time", "%d-%b-%Y %H:%M:%S %Z")
                .with_time_keep(true),
        ]
    }

    fn filters(&self) -> Vec<FilterRecord> {
        vec![
            // deprecation 경고는 노이즈
            FilterRecord::Grep(GrepFilter {
                match_pattern: DEFAULT_MATCH_TEMPLATE.to_owned(),
                regex: None,
                exclude: Some("log PHP Deprecated:".to_owned()),
            }),
            parse_log(&self.parsers()),
            FilterRecord::Nest(NestFilter {
                match_pattern: DEFAULT_MATCH_TEMPLATE.to_owned(),
                operation: Some(NestOperation::Lift),
                nested_under: Some("context".to_owned()),
                add_prefix: Some("context_".to_owned()),
                ..Default::default()
            }),
            FilterRecord::Modify(log_source_tag("php")),
        ]
    }
}
