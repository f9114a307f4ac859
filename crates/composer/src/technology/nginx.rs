//! Nginx 기술 정의

use logconf_core::pipeline::LogTechnology;
use logconf_core::types::{FilterRecord, ParserRecord};

use super::{log_source_tag, parse_log};
use crate::defaults::CLF_TIME;

/// `escape=json` access 로그의 `$time_iso8601` 형식
pub const NGINX_ISO8601_TIME: &str = "%Y-%m-%dT%H:%M:%S%z";

/// combined 형식 access 로그
pub const NGINX_ACCESS_REGEX: &str = r#"^(?<remote>[^ ]*) (?<host>[^ ]*) (?<user>[^ ]*) \[(?<time>[^\]]*)\] "(?<method>\S+)(?: +(?<path>[^"]*?)(?: +\S*)?)?" (?<code>[^ ]*) (?<size>[^ ]*)(?: "(?<referer>[^"]*)" "(?<agent>[^"]*)")?$"#;

/// error 로그 (`2024/01/15 12:00:00 [error] 29#29: *1 ...`)
pub const NGINX_ERROR_REGEX: &str =
    r"^(?<time>\d{4}/\d{2}/\d{2} \d{2}:\d{2}:\d{2}) \[(?<level>\w+)\] (?<pid>\d+)#(?<tid>\d+): (?<message>.*)$";

/// Nginx 기술
pub struct NginxTechnology;

impl LogTechnology for NginxTechnology {
    fn key(&self) -> &str {
        "nginx"
    }

    fn parsers(&self) -> Vec<ParserRecord> {
        vec![
            ParserRecord::json("nginx_json")
                .with_time("time_local", CLF_TIME)
                .with_time_keep(true),
            ParserRecord::json("nginx_access")
                .with_time("time_iso8601", NGINX_ISO8601_TIME)
                .with_time_keep(true)
                .with_types("status:integer body_bytes_sent:integer request_time:float"),
            ParserRecord::regex("nginx_access_regex", NGINX_ACCESS_REGEX)
                .with_time("time", CLF_TIME)
                .with_types("code:integer size:integer"),
            ParserRecord::regex("nginx_error", NGINX_ERROR_REGEX)
                .with_time("time", "%Y/%m/%d %H:%M:%S"),
        ]
    }

    fn filters(&self) -> Vec<FilterRecord> {
        vec![
            parse_log(&self.parsers()),
            FilterRecord::Modify(log_source_tag("nginx")),
        ]
    }
}
