//! 기술 정의 테이블과 레지스트리
//!
//! 각 기술(php, nginx, datadog, dotnet)은 core의
//! [`LogTechnology`](logconf_core::pipeline::LogTechnology) trait을 구현하는
//! 데이터 전용 구조체입니다. [`TechnologyRegistry`]는 기술 키로 정의를 조회합니다.
//!
//! # 사용 예시
//! ```ignore
//! use logconf_composer::technology::{TechnologyRegistry, PhpTechnology};
//!
//! let registry = TechnologyRegistry::new().register(Box::new(PhpTechnology));
//! assert!(registry.contains("php"));
//! ```

pub mod datadog;
pub mod dotnet;
pub mod nginx;
pub mod php;

pub use datadog::DatadogTechnology;
pub use dotnet::DotnetTechnology;
pub use nginx::NginxTechnology;
pub use php::PhpTechnology;

use std::collections::BTreeMap;

use logconf_core::pipeline::LogTechnology;
use logconf_core::types::{FilterRecord, ModifyFilter, ParserFilter, ParserRecord};
use serde::Serialize;

use crate::pattern::DEFAULT_MATCH_TEMPLATE;

/// 기술 레지스트리
///
/// 기술 키로 정의를 조회합니다.
///
/// 등록 순서가 유지되며, [`keys`](Self::keys)는 항상 같은 순서를 반환합니다.
pub struct TechnologyRegistry {
    /// 등록된 기술 목록
    technologies: Vec<Box<dyn LogTechnology>>,
}

impl TechnologyRegistry {
    /// 빈 레지스트리를 생성합니다.
    pub fn new() -> Self {
        Self {
            technologies: Vec::new(),
        }
    }

    /// 기본 기술 세트(php, nginx, datadog, dotnet)로 레지스트리를 생성합니다.
    pub fn with_defaults() -> Self {
        Self::new()
            .register(Box::new(PhpTechnology))
            .register(Box::new(NginxTechnology))
            .register(Box::new(DatadogTechnology))
            .register(Box::new(DotnetTechnology))
    }

    /// 기술을 등록합니다. 같은 키가 이미 있으면 그 자리에서 교체합니다.
    pub fn register(mut self, technology: Box<dyn LogTechnology>) -> Self {
        let key = technology.key().to_owned();
        match self.technologies.iter().position(|t| t.key() == key) {
            Some(pos) => {
                tracing::debug!(technology = %key, "replacing registered technology");
                self.technologies[pos] = technology;
            }
            None => self.technologies.push(technology),
        }
        self
    }

    /// 기술 키로 정의를 조회합니다.
    pub fn get(&self, key: &str) -> Option<&dyn LogTechnology> {
        self.technologies
            .iter()
            .find(|t| t.key() == key)
            .map(|t| t.as_ref())
    }

    /// 기술 키가 등록되어 있는지 확인합니다.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// 등록된 기술 키 목록을 반환합니다.
    pub fn keys(&self) -> Vec<&str> {
        self.technologies.iter().map(|t| t.key()).collect()
    }

    /// 등록된 기술 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.technologies.len()
    }

    /// 레지스트리가 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.technologies.is_empty()
    }

    /// 기술별 요약을 등록 순서대로 반환합니다.
    pub fn summaries(&self) -> Vec<TechnologySummary> {
        self.technologies
            .iter()
            .map(|t| TechnologySummary {
                key: t.key().to_owned(),
                parsers: t.parsers().into_iter().map(|p| p.name).collect(),
                filters: t.filters().iter().map(|f| f.name().to_owned()).collect(),
            })
            .collect()
    }
}

impl Default for TechnologyRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// 기술 요약 (목록 출력용)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnologySummary {
    /// 기술 키
    pub key: String,
    /// 파서 이름 목록
    pub parsers: Vec<String>,
    /// 필터 종류 목록
    pub filters: Vec<String>,
}

/// 컨테이너 원본 로그가 담기는 키
pub(crate) const LOG_KEY: &str = "log";

/// 컨테이너의 `log` 키를 기술 파서로 파싱하는 parser 필터 템플릿
///
/// 파서는 선언 순서대로 시도되며, 파싱된 필드 외의 나머지 필드는 유지됩니다.
pub(crate) fn parse_log(parsers: &[ParserRecord]) -> FilterRecord {
    FilterRecord::Parser(ParserFilter {
        match_pattern: DEFAULT_MATCH_TEMPLATE.to_owned(),
        key_name: Some(LOG_KEY.to_owned()),
        parsers: parsers.iter().map(|p| p.name.clone()).collect(),
        reserve_data: true,
        ..Default::default()
    })
}

/// `log_source=<key>` 필드를 추가하는 modify 필터 템플릿
pub(crate) fn log_source_tag(key: &str) -> ModifyFilter {
    ModifyFilter {
        match_pattern: DEFAULT_MATCH_TEMPLATE.to_owned(),
        add_fields: BTreeMap::from([("log_source".to_owned(), key.to_owned())]),
        ..Default::default()
    }
}
