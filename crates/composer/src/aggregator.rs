//! 파서/필터 조합기
//!
//! 요청된 로그 소스에 따라 기술 테이블을 병합하여 최종 출력 목록을 만듭니다.
//!
//! # 순서 규칙
//! ```text
//! parsers = 기본 파서 + 기술별 파서 블록 (처음 등장한 순서) + custom_parsers (입력 순서)
//! filters = 로그 소스별 필터 블록 (입력 순서, match 치환) + custom_filters (입력 순서)
//! ```
//!
//! 파서는 기술 범위이므로 같은 기술을 여러 컨테이너가 요청해도 한 번만 들어갑니다.
//! 필터는 컨테이너별로 복사되며, 같은 (기술, 컨테이너) 쌍은 한 번만 들어갑니다.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use logconf_core::pipeline::LogTechnology;
use logconf_core::types::{FilterRecord, LogSource, ModuleOutput, ParserRecord};

use crate::defaults::default_parsers;
use crate::error::ComposeError;
use crate::pattern::expand_match;
use crate::technology::TechnologyRegistry;

/// 파서/필터 조합기
pub struct Aggregator<'a> {
    /// 기술 정의 조회용 레지스트리
    registry: &'a TechnologyRegistry,
}

impl<'a> Aggregator<'a> {
    /// 레지스트리를 사용하는 조합기를 생성합니다.
    pub fn new(registry: &'a TechnologyRegistry) -> Self {
        Self { registry }
    }

    /// 로그 소스와 사용자 정의 레코드를 병합합니다.
    ///
    /// 모든 로그 소스의 기술을 먼저 조회하므로, 알 수 없는 기술이 있으면
    /// 출력을 만들기 전에 실패합니다.
    ///
    /// # Errors
    /// - 등록되지 않은 기술 키: [`ComposeError::UnknownTechnology`]
    /// - 최종 파서 이름 중복: [`ComposeError::DuplicateParserName`]
    pub fn compose(
        &self,
        log_sources: &[LogSource],
        custom_parsers: &[ParserRecord],
        custom_filters: &[FilterRecord],
    ) -> Result<ModuleOutput, ComposeError> {
        let resolved = self.resolve(log_sources)?;

        let mut parsers = default_parsers();
        let mut filters = Vec::new();
        let mut seen_technologies = HashSet::new();
        let mut seen_sources = HashSet::new();

        for (source, technology) in resolved {
            if seen_technologies.insert(technology.key()) {
                let block = technology.parsers();
                debug!(
                    technology = technology.key(),
                    count = block.len(),
                    "adding technology parsers"
                );
                parsers.extend(block);
            }

            if !seen_sources.insert((source.name.as_str(), source.container.as_str())) {
                warn!(
                    technology = %source.name,
                    container = %source.container,
                    "duplicate log source, skipping filters"
                );
                continue;
            }

            let block: Vec<_> = technology
                .filters()
                .into_iter()
                .map(|filter| {
                    let pattern = expand_match(filter.match_pattern(), &source.container);
                    filter.with_match(pattern)
                })
                .collect();
            debug!(
                technology = technology.key(),
                container = %source.container,
                count = block.len(),
                "adding container filters"
            );
            filters.extend(block);
        }

        parsers.extend(custom_parsers.iter().cloned());
        filters.extend(custom_filters.iter().cloned());

        ensure_unique_parser_names(&parsers)?;

        info!(
            technologies = seen_technologies.len(),
            parsers = parsers.len(),
            filters = filters.len(),
            "composed log configuration"
        );

        Ok(ModuleOutput {
            log_config_parsers: parsers,
            log_config_filters: filters,
        })
    }

    /// 각 로그 소스의 기술 정의를 조회합니다.
    fn resolve<'s>(
        &self,
        log_sources: &'s [LogSource],
    ) -> Result<Vec<(&'s LogSource, &'a dyn LogTechnology)>, ComposeError> {
        log_sources
            .iter()
            .map(|source| {
                self.registry
                    .get(&source.name)
                    .map(|technology| (source, technology))
                    .ok_or_else(|| ComposeError::UnknownTechnology {
                        name: source.name.clone(),
                        available: self.registry.keys().join(", "),
                    })
            })
            .collect()
    }
}

/// 파서 이름이 모두 유일한지 검증합니다. 덮어쓰지 않고 첫 중복에서 실패합니다.
fn ensure_unique_parser_names(parsers: &[ParserRecord]) -> Result<(), ComposeError> {
    let mut names = HashSet::with_capacity(parsers.len());
    for parser in parsers {
        if !names.insert(parser.name.as_str()) {
            return Err(ComposeError::DuplicateParserName {
                name: parser.name.clone(),
            });
        }
    }
    Ok(())
}
