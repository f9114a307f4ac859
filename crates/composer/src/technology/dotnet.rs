//! .NET 기술 정의
//!
//! Serilog compact JSON(`@t`, `@m`, `@l`, `@x`) 로그를 다룹니다.

use std::collections::BTreeMap;

use logconf_core::pipeline::LogTechnology;
use logconf_core::types::{FilterRecord, ParserRecord};

use super::{log_source_tag, parse_log};
use crate::defaults::ISO8601_FRACTIONAL;

/// .NET 기술
pub struct DotnetTechnology;

impl LogTechnology for DotnetTechnology {
    fn key(&self) -> &str {
        "dotnet"
    }

    fn parsers(&self) -> Vec<ParserRecord> {
        vec![
            ParserRecord::json("dotnet_json")
                .with_time("@t", ISO8601_FRACTIONAL)
                .with_time_keep(true),
        ]
    }

    fn filters(&self) -> Vec<FilterRecord> {
        let mut modify = log_source_tag("dotnet");
        modify.rename_fields = BTreeMap::from([
            ("@l".to_owned(), "level".to_owned()),
            ("@m".to_owned(), "message".to_owned()),
            ("@x".to_owned(), "exception".to_owned()),
        ]);
        vec![parse_log(&self.parsers()), FilterRecord::Modify(modify)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renames_compact_fields_and_tags_source() {
        let filters = DotnetTechnology.filters();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0].name(), "parser");
        match &filters[1] {
            FilterRecord::Modify(modify) => {
                assert_eq!(modify.rename_fields.get("@m").map(String::as_str), Some("message"));
                assert_eq!(
                    modify.add_fields.get("log_source").map(String::as_str),
                    Some("dotnet")
                );
            }
            other => panic!("expected modify filter, got {other:?}"),
        }
    }

    #[test]
    fn parser_uses_serilog_timestamp() {
        let parsers = DotnetTechnology.parsers();
        assert_eq!(parsers[0].time_key.as_deref(), Some("@t"));
    }
}
