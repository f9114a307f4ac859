//! Datadog APM 기술 정의
//!
//! 트레이서 사이드카 로그 중 `Luscii APM` 표식이 있는 줄만 남깁니다.
//! 기술 범위 파서는 없습니다.

use logconf_core::pipeline::LogTechnology;
use logconf_core::types::{FilterRecord, GrepFilter, ParserRecord};

use super::log_source_tag;
use crate::pattern::DEFAULT_MATCH_TEMPLATE;

/// Datadog APM 기술
pub struct DatadogTechnology;

impl LogTechnology for DatadogTechnology {
    fn key(&self) -> &str {
        "datadog"
    }

    fn parsers(&self) -> Vec<ParserRecord> {
        Vec::new()
    }

    fn filters(&self) -> Vec<FilterRecord> {
        vec![
            FilterRecord::Grep(GrepFilter {
                match_pattern: DEFAULT_MATCH_TEMPLATE.to_owned(),
                regex: Some("log Luscii APM".to_owned()),
                exclude: None,
            }),
            FilterRecord::Modify(log_source_tag("datadog")),
        ]
    }
}
