//! 도메인 타입 -- 파서/필터 레코드, 로그 소스, 모듈 입출력
//!
//! 모든 타입은 `serde`로 직렬화/역직렬화되며, 설정 파일(TOML/YAML/JSON)의
//! 구조와 1:1로 대응합니다. 선택 필드는 직렬화 시 생략됩니다.
//!
//! 필드의 허용 여부는 판별자(`ParserRecord::format`, `FilterRecord`의 `name`)에
//! 따라 달라지므로 각 레코드는 `validate()`로 검증합니다.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RecordError;

/// 필터 match 템플릿에서 컨테이너 이름으로 치환되는 자리표시자
pub const CONTAINER_PLACEHOLDER: &str = "{container}";

/// 모든 컨테이너를 의미하는 컨테이너 값
pub const WILDCARD_CONTAINER: &str = "*";

// =============================================================================
// 파서
// =============================================================================

/// 파서 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserFormat {
    /// 구조화 JSON
    Json,
    /// 정규식 (named capture)
    Regex,
    /// Labeled Tab-separated Values
    Ltsv,
    /// key=value 형식
    Logfmt,
}

impl ParserFormat {
    /// Fluent Bit 설정에 쓰이는 형식 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Regex => "regex",
            Self::Ltsv => "ltsv",
            Self::Logfmt => "logfmt",
        }
    }
}

impl fmt::Display for ParserFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 파서와 짝지어지는 parser 필터 설정
///
/// 이 모듈은 값을 해석하지 않고 그대로 전달합니다.
/// 다운스트림 렌더러가 `[FILTER] Name parser` 스탠자를 만들 때 사용합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterBinding {
    /// 필터 match 패턴 (미지정 시 `*`)
    #[serde(rename = "match", default, skip_serializing_if = "Option::is_none")]
    pub match_pattern: Option<String>,
    /// 파싱 대상 키 (미지정 시 `log`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
    /// 파싱 후 나머지 필드 유지
    #[serde(default)]
    pub reserve_data: bool,
    /// 원본 키 유지
    #[serde(default)]
    pub preserve_key: bool,
    /// 키 값의 이스케이프 해제
    #[serde(default)]
    pub unescape_key: bool,
}

/// 파서 레코드
///
/// Fluent Bit `[PARSER]` 스탠자 하나에 대응합니다.
///
/// # 필드 규칙
/// - `name`은 비어 있을 수 없고, 최종 출력 목록에서 유일해야 합니다.
/// - `regex` 형식은 `regex` 필드가 필수이며, 다른 형식은 `regex`를 가질 수 없습니다.
/// - `decode_field_as`는 `decode_field`와 함께 지정해야 합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserRecord {
    /// 파서 이름
    #[serde(default)]
    pub name: String,
    /// 파서 형식
    pub format: ParserFormat,
    /// 타임스탬프 필드명
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_key: Option<String>,
    /// strptime 형식 타임스탬프 포맷
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_format: Option<String>,
    /// 파싱 후 타임스탬프 필드 유지 여부
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_keep: Option<bool>,
    /// 정규식 (`regex` 형식 전용)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    /// 디코딩 대상 필드
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decode_field: Option<String>,
    /// 필드 디코더 (json, escaped, escaped_utf8)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decode_field_as: Option<String>,
    /// 필드 타입 변환 (`code:integer size:integer`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<String>,
    /// 빈 값 필드 생략 여부
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_empty_values: Option<bool>,
    /// 짝지어지는 parser 필터 설정
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<FilterBinding>,
}

impl ParserRecord {
    /// 이름과 형식만 가진 파서를 생성합니다.
    pub fn new(name: impl Into<String>, format: ParserFormat) -> Self {
        Self {
            name: name.into(),
            format,
            time_key: None,
            time_format: None,
            time_keep: None,
            regex: None,
            decode_field: None,
            decode_field_as: None,
            types: None,
            skip_empty_values: None,
            filter: None,
        }
    }

    /// JSON 파서를 생성합니다.
    pub fn json(name: impl Into<String>) -> Self {
        Self::new(name, ParserFormat::Json)
    }

    /// 정규식 파서를 생성합니다.
    pub fn regex(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        let mut parser = Self::new(name, ParserFormat::Regex);
        parser.regex = Some(pattern.into());
        parser
    }

    /// 타임스탬프 키와 포맷을 설정합니다.
    pub fn with_time(mut self, key: impl Into<String>, format: impl Into<String>) -> Self {
        self.time_key = Some(key.into());
        self.time_format = Some(format.into());
        self
    }

    /// 타임스탬프 필드 유지 여부를 설정합니다.
    pub fn with_time_keep(mut self, keep: bool) -> Self {
        self.time_keep = Some(keep);
        self
    }

    /// 필드 타입 변환을 설정합니다.
    pub fn with_types(mut self, types: impl Into<String>) -> Self {
        self.types = Some(types.into());
        self
    }

    /// 필드 디코더를 설정합니다.
    pub fn with_decoder(mut self, field: impl Into<String>, decoder: impl Into<String>) -> Self {
        self.decode_field = Some(field.into());
        self.decode_field_as = Some(decoder.into());
        self
    }

    /// parser 필터 바인딩을 설정합니다.
    pub fn with_filter(mut self, binding: FilterBinding) -> Self {
        self.filter = Some(binding);
        self
    }

    /// 레코드 종류 설명 (에러 메시지용)
    pub fn kind(&self) -> String {
        format!("{} parser", self.format)
    }

    /// 형식에 따른 필드 규칙을 검증합니다.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.name.trim().is_empty() {
            return Err(RecordError::MissingField {
                kind: self.kind(),
                field: "name".to_owned(),
            });
        }

        reject_control_chars(&self.kind(), self.text_fields())?;

        match self.format {
            ParserFormat::Regex => {
                if is_blank(&self.regex) {
                    return Err(RecordError::MissingField {
                        kind: self.kind(),
                        field: "regex".to_owned(),
                    });
                }
            }
            ParserFormat::Json | ParserFormat::Ltsv | ParserFormat::Logfmt => {
                if self.regex.is_some() {
                    return Err(RecordError::FieldNotAllowed {
                        kind: self.kind(),
                        field: "regex".to_owned(),
                    });
                }
            }
        }

        if self.decode_field_as.is_some() && self.decode_field.is_none() {
            return Err(RecordError::MissingField {
                kind: self.kind(),
                field: "decode_field".to_owned(),
            });
        }

        Ok(())
    }

    /// 스탠자 한 줄로 렌더링되는 문자열 필드
    fn text_fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![("name", self.name.as_str())];
        let optional = [
            ("regex", &self.regex),
            ("time_key", &self.time_key),
            ("time_format", &self.time_format),
            ("decode_field", &self.decode_field),
            ("decode_field_as", &self.decode_field_as),
            ("types", &self.types),
        ];
        fields.extend(
            optional
                .into_iter()
                .filter_map(|(field, value)| value.as_deref().map(|v| (field, v))),
        );
        if let Some(binding) = &self.filter {
            if let Some(pattern) = &binding.match_pattern {
                fields.push(("filter.match", pattern.as_str()));
            }
            if let Some(key) = &binding.key_name {
                fields.push(("filter.key_name", key.as_str()));
            }
        }
        fields
    }
}

// =============================================================================
// 필터
// =============================================================================

/// grep 필터
///
/// 정규식으로 레코드를 포함/제외합니다.
///
/// `regex`/`exclude` 값은 Fluent Bit 형식(`KEY REGEX`) 그대로입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrepFilter {
    /// 태그 glob
    #[serde(rename = "match", default)]
    pub match_pattern: String,
    /// 포함 조건
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    /// 제외 조건
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
}

/// modify 필터
///
/// 필드 추가/이름 변경/제거
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyFilter {
    /// 태그 glob
    #[serde(rename = "match", default)]
    pub match_pattern: String,
    /// 추가할 필드 (키 순서로 정렬)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub add_fields: BTreeMap<String, String>,
    /// 이름을 바꿀 필드 (원래 이름 -> 새 이름)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rename_fields: BTreeMap<String, String>,
    /// 제거할 필드
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub remove_fields: Vec<String>,
}

/// parser 필터
///
/// 지정한 키를 파서로 다시 파싱합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserFilter {
    /// 태그 glob
    #[serde(rename = "match", default)]
    pub match_pattern: String,
    /// 파싱 대상 키
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
    /// 사용할 파서 이름 목록. Fluent Bit는 나열된 순서대로 시도합니다.
    ///
    /// 설정 파일에서는 문자열 하나 또는 목록으로 쓸 수 있습니다.
    #[serde(
        rename = "parser",
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub parsers: Vec<String>,
    /// 나머지 필드 유지
    #[serde(default)]
    pub reserve_data: bool,
    /// 원본 키 유지
    #[serde(default)]
    pub preserve_key: bool,
    /// 이스케이프 해제
    #[serde(default)]
    pub unescape_key: bool,
}

/// nest 필터 동작
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NestOperation {
    /// 필드를 하위 맵으로 묶음
    Nest,
    /// 하위 맵의 필드를 최상위로 올림
    Lift,
}

impl NestOperation {
    /// Fluent Bit 설정에 쓰이는 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nest => "nest",
            Self::Lift => "lift",
        }
    }
}

/// nest 필터
///
/// 레코드 구조 변경
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestFilter {
    /// 태그 glob
    #[serde(rename = "match", default)]
    pub match_pattern: String,
    /// nest/lift
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<NestOperation>,
    /// 묶을 필드 glob (`nest` 전용)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wildcard: Option<String>,
    /// 묶을 대상 맵 이름 (`nest` 전용)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nest_under: Option<String>,
    /// 올릴 대상 맵 이름 (`lift` 전용)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nested_under: Option<String>,
    /// 제거할 키 접두사
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_prefix: Option<String>,
    /// 추가할 키 접두사
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_prefix: Option<String>,
}

/// 필터 레코드
///
/// Fluent Bit `[FILTER]` 스탠자 하나에 대응합니다.
///
/// `name` 필드(필터 종류)를 판별자로 하는 tagged union입니다.
///
/// ```yaml
/// name: grep
/// match: "*app*"
/// exclude: log PHP Deprecated:
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum FilterRecord {
    /// grep 필터
    Grep(GrepFilter),
    /// modify 필터
    Modify(ModifyFilter),
    /// parser 필터
    Parser(ParserFilter),
    /// nest 필터
    Nest(NestFilter),
}

impl FilterRecord {
    /// 필터 종류 이름 (`grep`, `modify`, `parser`, `nest`)
    pub fn name(&self) -> &'static str {
        match self {
            Self::Grep(_) => "grep",
            Self::Modify(_) => "modify",
            Self::Parser(_) => "parser",
            Self::Nest(_) => "nest",
        }
    }

    /// 레코드 종류 설명 (에러 메시지용)
    pub fn kind(&self) -> String {
        format!("{} filter", self.name())
    }

    /// 태그 glob
    pub fn match_pattern(&self) -> &str {
        match self {
            Self::Grep(f) => &f.match_pattern,
            Self::Modify(f) => &f.match_pattern,
            Self::Parser(f) => &f.match_pattern,
            Self::Nest(f) => &f.match_pattern,
        }
    }

    /// match 패턴만 바꾼 복사본을 반환합니다.
    pub fn with_match(mut self, pattern: impl Into<String>) -> Self {
        let pattern = pattern.into();
        match &mut self {
            Self::Grep(f) => f.match_pattern = pattern,
            Self::Modify(f) => f.match_pattern = pattern,
            Self::Parser(f) => f.match_pattern = pattern,
            Self::Nest(f) => f.match_pattern = pattern,
        }
        self
    }

    /// 필터 종류에 따른 필드 규칙을 검증합니다.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.match_pattern().trim().is_empty() {
            return Err(self.missing("match"));
        }

        reject_control_chars(&self.kind(), self.text_fields())?;

        match self {
            Self::Grep(f) => {
                if is_blank(&f.regex) && is_blank(&f.exclude) {
                    return Err(RecordError::MissingOneOf {
                        kind: self.kind(),
                        fields: "regex, exclude".to_owned(),
                    });
                }
                // 지정된 값이 비어 있으면 값 없는 키가 렌더링됨
                if f.regex.is_some() && is_blank(&f.regex) {
                    return Err(self.missing("regex"));
                }
                if f.exclude.is_some() && is_blank(&f.exclude) {
                    return Err(self.missing("exclude"));
                }
            }
            Self::Modify(f) => {
                if f.add_fields.is_empty() && f.rename_fields.is_empty() && f.remove_fields.is_empty()
                {
                    return Err(RecordError::MissingOneOf {
                        kind: self.kind(),
                        fields: "add_fields, rename_fields, remove_fields".to_owned(),
                    });
                }
            }
            Self::Parser(f) => {
                if is_blank(&f.key_name) {
                    return Err(self.missing("key_name"));
                }
                if f.parsers.is_empty() || f.parsers.iter().any(|p| p.trim().is_empty()) {
                    return Err(self.missing("parser"));
                }
            }
            Self::Nest(f) => match f.operation {
                None => return Err(self.missing("operation")),
                Some(NestOperation::Nest) => {
                    if is_blank(&f.wildcard) {
                        return Err(self.missing("wildcard"));
                    }
                    if is_blank(&f.nest_under) {
                        return Err(self.missing("nest_under"));
                    }
                }
                Some(NestOperation::Lift) => {
                    if is_blank(&f.nested_under) {
                        return Err(self.missing("nested_under"));
                    }
                }
            },
        }

        Ok(())
    }

    fn missing(&self, field: &str) -> RecordError {
        RecordError::MissingField {
            kind: self.kind(),
            field: field.to_owned(),
        }
    }

    /// 스탠자 한 줄로 렌더링되는 문자열 필드
    fn text_fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![("match", self.match_pattern())];
        let optional: Vec<(&'static str, &Option<String>)> = match self {
            Self::Grep(f) => vec![("regex", &f.regex), ("exclude", &f.exclude)],
            Self::Modify(f) => {
                for (key, value) in f.add_fields.iter().chain(&f.rename_fields) {
                    fields.push(("modify key", key.as_str()));
                    fields.push(("modify value", value.as_str()));
                }
                fields.extend(f.remove_fields.iter().map(|k| ("remove_fields", k.as_str())));
                Vec::new()
            }
            Self::Parser(f) => {
                fields.extend(f.parsers.iter().map(|p| ("parser", p.as_str())));
                vec![("key_name", &f.key_name)]
            }
            Self::Nest(f) => vec![
                ("wildcard", &f.wildcard),
                ("nest_under", &f.nest_under),
                ("nested_under", &f.nested_under),
                ("remove_prefix", &f.remove_prefix),
                ("add_prefix", &f.add_prefix),
            ],
        };
        fields.extend(
            optional
                .into_iter()
                .filter_map(|(field, value)| value.as_deref().map(|v| (field, v))),
        );
        fields
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

/// 값에 줄바꿈 같은 제어 문자가 있으면 거부합니다.
///
/// 스탠자는 한 줄에 키 하나만 씁니다.
fn reject_control_chars<'a>(
    kind: &str,
    fields: impl IntoIterator<Item = (&'static str, &'a str)>,
) -> Result<(), RecordError> {
    match fields
        .into_iter()
        .find(|(_, value)| value.chars().any(char::is_control))
    {
        Some((field, _)) => Err(RecordError::ControlCharacter {
            kind: kind.to_owned(),
            field: field.to_owned(),
        }),
        None => Ok(()),
    }
}

/// 문자열 하나 또는 문자열 목록을 목록으로 역직렬화합니다.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(parser) => vec![parser],
        OneOrMany::Many(parsers) => parsers,
    })
}

// =============================================================================
// 로그 소스 / 모듈 입출력
// =============================================================================

fn default_container() -> String {
    WILDCARD_CONTAINER.to_owned()
}

/// 로그 소스
///
/// (기술, 컨테이너) 쌍
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogSource {
    /// 기술 키 (php, nginx, datadog, dotnet 등)
    #[serde(default)]
    pub name: String,
    /// 컨테이너 이름 (기본값 `*`)
    #[serde(default = "default_container")]
    pub container: String,
}

impl LogSource {
    /// 특정 컨테이너에 대한 로그 소스를 생성합니다.
    pub fn new(name: impl Into<String>, container: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            container: container.into(),
        }
    }

    /// 모든 컨테이너에 대한 로그 소스를 생성합니다.
    pub fn any_container(name: impl Into<String>) -> Self {
        Self::new(name, WILDCARD_CONTAINER)
    }

    /// 컨테이너가 와일드카드인지 확인합니다.
    pub fn is_wildcard(&self) -> bool {
        self.container == WILDCARD_CONTAINER
    }
}

/// 모듈 입력
///
/// `context`는 외부 라벨링 협력자에게 전달되는 값으로, 여기서는 해석하지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleInput {
    /// 모듈 식별자
    #[serde(default)]
    pub name: String,
    /// 라벨링 컨텍스트 (객체)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
    /// 요청된 로그 소스
    #[serde(default)]
    pub log_sources: Vec<LogSource>,
    /// 사용자 정의 파서
    #[serde(default)]
    pub custom_parsers: Vec<ParserRecord>,
    /// 사용자 정의 필터
    #[serde(default)]
    pub custom_filters: Vec<FilterRecord>,
}

impl ModuleInput {
    /// 이름만 가진 입력을 생성합니다.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// 로그 소스를 추가합니다.
    pub fn with_source(mut self, source: LogSource) -> Self {
        self.log_sources.push(source);
        self
    }

    /// 사용자 정의 파서를 추가합니다.
    pub fn with_custom_parser(mut self, parser: ParserRecord) -> Self {
        self.custom_parsers.push(parser);
        self
    }

    /// 사용자 정의 필터를 추가합니다.
    pub fn with_custom_filter(mut self, filter: FilterRecord) -> Self {
        self.custom_filters.push(filter);
        self
    }
}

/// 모듈 출력
///
/// 다운스트림 container-definitions 렌더러가 소비합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleOutput {
    /// 순서가 보장된 파서 목록
    pub log_config_parsers: Vec<ParserRecord>,
    /// 순서가 보장된 필터 목록
    pub log_config_filters: Vec<FilterRecord>,
}
