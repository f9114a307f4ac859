//! 공개 인터페이스 -- 입력 검증과 출력 생성
//!
//! [`LogConfigModule`]은 모듈 입력을 검증한 뒤 [`Aggregator`]를 호출하여
//! `log_config_parsers` / `log_config_filters`를 만듭니다.
//! 첫 번째 에러에서 즉시 실패하며 부분 결과는 반환하지 않습니다.
//!
//! # 사용 예시
//! ```ignore
//! use logconf_composer::LogConfigModule;
//! use logconf_core::types::{LogSource, ModuleInput};
//!
//! let input = ModuleInput::new("api")
//!     .with_source(LogSource::new("php", "app"))
//!     .with_source(LogSource::new("nginx", "web"));
//!
//! let output = LogConfigModule::new().evaluate(&input)?;
//! ```

use tracing::{debug, warn};

use logconf_core::types::{ModuleInput, ModuleOutput, ParserFormat, ParserRecord};

use crate::aggregator::Aggregator;
use crate::error::ComposeError;
use crate::technology::TechnologyRegistry;

/// 파서/필터 조합 모듈
pub struct LogConfigModule {
    /// 기술 정의 레지스트리
    registry: TechnologyRegistry,
}

impl LogConfigModule {
    /// 기본 기술 세트로 모듈을 생성합니다.
    pub fn new() -> Self {
        Self::with_registry(TechnologyRegistry::with_defaults())
    }

    /// 지정한 레지스트리로 모듈을 생성합니다.
    pub fn with_registry(registry: TechnologyRegistry) -> Self {
        Self { registry }
    }

    /// 기술 레지스트리를 반환합니다.
    pub fn registry(&self) -> &TechnologyRegistry {
        &self.registry
    }

    /// 입력을 검증하고 출력 목록을 생성합니다.
    pub fn evaluate(&self, input: &ModuleInput) -> Result<ModuleOutput, ComposeError> {
        self.validate(input)?;
        Aggregator::new(&self.registry).compose(
            &input.log_sources,
            &input.custom_parsers,
            &input.custom_filters,
        )
    }

    /// 입력의 유효성을 검증합니다.
    ///
    /// # 검증 규칙
    /// - `name`은 비어 있지 않아야 함
    /// - `context`는 지정된 경우 객체여야 함
    /// - 로그 소스의 `name`/`container`는 비어 있지 않아야 하고, `name`은 등록된 기술이어야 함
    /// - 사용자 정의 파서/필터는 종류별 필수 필드를 갖춰야 함
    pub fn validate(&self, input: &ModuleInput) -> Result<(), ComposeError> {
        if input.name.trim().is_empty() {
            return Err(ComposeError::InvalidInput {
                field: "name".to_owned(),
                reason: "must not be empty".to_owned(),
            });
        }

        if let Some(context) = &input.context {
            if !context.is_object() {
                return Err(ComposeError::InvalidInput {
                    field: "context".to_owned(),
                    reason: "must be an object".to_owned(),
                });
            }
        }

        for (index, source) in input.log_sources.iter().enumerate() {
            if source.name.trim().is_empty() {
                return Err(ComposeError::InvalidLogSource {
                    index,
                    reason: "name must not be empty".to_owned(),
                });
            }
            if source.container.trim().is_empty() {
                return Err(ComposeError::InvalidLogSource {
                    index,
                    reason: format!("container for '{}' must not be empty", source.name),
                });
            }
            if !self.registry.contains(&source.name) {
                return Err(ComposeError::UnknownTechnology {
                    name: source.name.clone(),
                    available: self.registry.keys().join(", "),
                });
            }
        }

        for (index, parser) in input.custom_parsers.iter().enumerate() {
            parser
                .validate()
                .map_err(|source| ComposeError::InvalidCustomRecord {
                    kind: "parser",
                    index,
                    name: parser.name.clone(),
                    source,
                })?;
            check_regex(parser);
        }

        for (index, filter) in input.custom_filters.iter().enumerate() {
            filter
                .validate()
                .map_err(|source| ComposeError::InvalidCustomRecord {
                    kind: "filter",
                    index,
                    name: filter.name().to_owned(),
                    source,
                })?;
        }

        debug!(
            name = %input.name,
            log_sources = input.log_sources.len(),
            custom_parsers = input.custom_parsers.len(),
            custom_filters = input.custom_filters.len(),
            "module input validated"
        );

        Ok(())
    }
}

impl Default for LogConfigModule {
    fn default() -> Self {
        Self::new()
    }
}

/// 기본 기술 세트로 입력을 평가합니다.
pub fn evaluate(input: &ModuleInput) -> Result<ModuleOutput, ComposeError> {
    LogConfigModule::new().evaluate(input)
}

/// 사용자 정의 정규식을 `regex` 크레이트로 컴파일해 봅니다.
///
/// Fluent Bit는 Onigmo를 사용하므로 여기서 실패해도 에러로 취급하지 않습니다.
fn check_regex(parser: &ParserRecord) {
    if parser.format != ParserFormat::Regex {
        return;
    }
    if let Some(pattern) = &parser.regex {
        if let Err(e) = regex::Regex::new(pattern) {
            warn!(
                parser = %parser.name,
                error = %e,
                "custom regex does not compile with the reference engine, passing through"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logconf_core::types::{FilterRecord, LogSource, ModifyFilter, ParserFilter};

    fn input() -> ModuleInput {
        ModuleInput::new("api")
    }

    #[test]
    fn evaluate_empty_input_yields_defaults() {
        let output = evaluate(&input()).unwrap();
        assert_eq!(output.log_config_parsers.len(), 3);
        assert!(output.log_config_filters.is_empty());
    }

    #[test]
    fn empty_name_is_rejected() {
        let err = evaluate(&ModuleInput::default()).unwrap_err();
        assert!(matches!(err, ComposeError::InvalidInput { ref field, .. } if field == "name"));
    }

    #[test]
    fn non_object_context_is_rejected() {
        let mut input = input();
        input.context = Some(serde_json::json!(["not", "an", "object"]));
        let err = evaluate(&input).unwrap_err();
        assert!(err.to_string().contains("context"));

        input.context = Some(serde_json::json!({ "namespace": "luscii" }));
        evaluate(&input).unwrap();
    }

    #[test]
    fn empty_log_source_name_is_rejected() {
        let input = input().with_source(LogSource::any_container(""));
        let err = evaluate(&input).unwrap_err();
        assert!(matches!(err, ComposeError::InvalidLogSource { index: 0, .. }));
    }

    #[test]
    fn empty_container_is_rejected() {
        let input = input()
            .with_source(LogSource::new("php", "app"))
            .with_source(LogSource::new("nginx", " "));
        let err = evaluate(&input).unwrap_err();
        assert!(matches!(err, ComposeError::InvalidLogSource { index: 1, .. }));
    }

    #[test]
    fn unknown_technology_is_rejected() {
        let input = input().with_source(LogSource::any_container("unknown"));
        let err = evaluate(&input).unwrap_err();
        assert!(matches!(err, ComposeError::UnknownTechnology { .. }));
    }

    #[test]
    fn regex_parser_without_regex_is_rejected() {
        let mut parser = ParserRecord::new("broken", ParserFormat::Regex);
        parser.time_key = Some("time".to_owned());
        let input = input()
            .with_custom_parser(ParserRecord::json("fine"))
            .with_custom_parser(parser);
        let err = evaluate(&input).unwrap_err();
        match err {
            ComposeError::InvalidCustomRecord {
                kind, index, name, ..
            } => {
                assert_eq!(kind, "parser");
                assert_eq!(index, 1);
                assert_eq!(name, "broken");
            }
            other => panic!("expected InvalidCustomRecord, got {other:?}"),
        }
    }

    #[test]
    fn incomplete_custom_filter_is_rejected() {
        let input = input().with_custom_filter(FilterRecord::Parser(ParserFilter {
            match_pattern: "*".to_owned(),
            parsers: vec!["json_time".to_owned()],
            ..Default::default()
        }));
        let err = evaluate(&input).unwrap_err();
        assert!(matches!(
            err,
            ComposeError::InvalidCustomRecord { kind: "filter", .. }
        ));
        assert!(err.to_string().contains("key_name"));
    }

    #[test]
    fn multiline_custom_value_is_rejected_before_rendering() {
        let input = input().with_custom_filter(FilterRecord::Modify(ModifyFilter {
            match_pattern: "*".to_owned(),
            add_fields: [("service".to_owned(), "api\n    Remove password".to_owned())]
                .into_iter()
                .collect(),
            ..Default::default()
        }));
        let err = evaluate(&input).unwrap_err();
        assert!(matches!(
            err,
            ComposeError::InvalidCustomRecord { kind: "filter", .. }
        ));
        assert!(err.to_string().contains("control characters"));
    }

    #[test]
    fn onigmo_only_regex_is_passed_through() {
        // 후방 탐색은 regex 크레이트에서 지원하지 않지만 Fluent Bit에서는 유효
        let parser = ParserRecord::regex("lookbehind", r"^(?<=x)(?<message>.*)$");
        let input = input().with_custom_parser(parser);
        let output = evaluate(&input).unwrap();
        assert_eq!(
            output.log_config_parsers.last().map(|p| p.name.as_str()),
            Some("lookbehind")
        );
    }

    #[test]
    fn valid_custom_records_are_emitted() {
        let input = input()
            .with_source(LogSource::new("dotnet", "worker"))
            .with_custom_filter(FilterRecord::Modify(ModifyFilter {
                match_pattern: "*worker*".to_owned(),
                remove_fields: vec!["@mt".to_owned()],
                ..Default::default()
            }));
        let output = LogConfigModule::default().evaluate(&input).unwrap();
        assert_eq!(output.log_config_filters.len(), 3);
        assert_eq!(output.log_config_filters[0].match_pattern(), "*worker*");
    }
}
