//! Fluent Bit 설정 렌더러
//!
//! 모듈 출력을 Fluent Bit classic 형식의 `[PARSER]` / `[FILTER]` 스탠자로 변환합니다.
//! 다운스트림 container-definitions 렌더러가 만드는 것과 같은 모양입니다.
//!
//! 파서에 `filter` 바인딩이 있으면 그 파서를 쓰는 `parser` 필터가 함께 렌더링되며,
//! 이 필터들은 `log_config_filters`보다 앞에 옵니다.
//!
//! ```text
//! [PARSER]
//!     Name           php_error
//!     Format         regex
//!     Regex          ^\[(?<time>[^\]]+)\] ...
//!     Time_Key       time
//! ```

use std::fmt::Write;

use logconf_core::types::{FilterRecord, ModuleOutput, ParserFilter, ParserRecord};

/// 바인딩에 match가 없을 때 쓰는 패턴
const DEFAULT_BINDING_MATCH: &str = "*";

/// 바인딩에 key_name이 없을 때 쓰는 키
const DEFAULT_BINDING_KEY: &str = "log";

/// Fluent Bit classic 형식 렌더러
#[derive(Debug, Clone)]
pub struct FluentBitRenderer {
    /// 키 앞 들여쓰기 폭
    indent: usize,
    /// 키 열 폭
    key_width: usize,
}

impl Default for FluentBitRenderer {
    fn default() -> Self {
        Self {
            indent: 4,
            key_width: 14,
        }
    }
}

impl FluentBitRenderer {
    /// 기본 폭으로 렌더러를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 키 열 폭을 설정합니다.
    pub fn with_key_width(mut self, width: usize) -> Self {
        self.key_width = width;
        self
    }

    /// 파서 파일 내용을 렌더링합니다.
    pub fn render_parsers(&self, parsers: &[ParserRecord]) -> String {
        let mut out = String::new();
        for (i, parser) in parsers.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            self.write_parser(&mut out, parser);
        }
        out
    }

    /// 필터 스탠자를 렌더링합니다. 바인딩 필터가 먼저 옵니다.
    pub fn render_filters(&self, output: &ModuleOutput) -> String {
        let mut out = String::new();
        let bound = binding_filters(&output.log_config_parsers);
        for (i, filter) in bound.iter().chain(&output.log_config_filters).enumerate() {
            if i > 0 {
                out.push('\n');
            }
            self.write_filter(&mut out, filter);
        }
        out
    }

    fn write_parser(&self, out: &mut String, parser: &ParserRecord) {
        out.push_str("[PARSER]\n");
        self.entry(out, "Name", &parser.name);
        self.entry(out, "Format", parser.format.as_str());
        self.opt(out, "Regex", parser.regex.as_deref());
        self.opt(out, "Time_Key", parser.time_key.as_deref());
        self.opt(out, "Time_Format", parser.time_format.as_deref());
        if let Some(keep) = parser.time_keep {
            self.entry(out, "Time_Keep", on_off(keep));
        }
        match (&parser.decode_field, &parser.decode_field_as) {
            (Some(field), Some(decoder)) => {
                self.entry(out, "Decode_Field_As", &format!("{decoder} {field}"));
            }
            (Some(field), None) => {
                self.entry(out, "Decode_Field", &format!("json {field}"));
            }
            _ => {}
        }
        self.opt(out, "Types", parser.types.as_deref());
        if let Some(skip) = parser.skip_empty_values {
            self.entry(out, "Skip_Empty_Values", on_off(skip));
        }
    }

    fn write_filter(&self, out: &mut String, filter: &FilterRecord) {
        out.push_str("[FILTER]\n");
        self.entry(out, "Name", filter.name());
        self.entry(out, "Match", filter.match_pattern());
        match filter {
            FilterRecord::Grep(f) => {
                self.opt(out, "Regex", f.regex.as_deref());
                self.opt(out, "Exclude", f.exclude.as_deref());
            }
            FilterRecord::Modify(f) => {
                for (from, to) in &f.rename_fields {
                    self.entry(out, "Rename", &format!("{from} {to}"));
                }
                for (key, value) in &f.add_fields {
                    self.entry(out, "Add", &format!("{key} {value}"));
                }
                for key in &f.remove_fields {
                    self.entry(out, "Remove", key);
                }
            }
            FilterRecord::Parser(f) => {
                self.opt(out, "Key_Name", f.key_name.as_deref());
                for parser in &f.parsers {
                    self.entry(out, "Parser", parser);
                }
                self.entry(out, "Reserve_Data", on_off(f.reserve_data));
                self.entry(out, "Preserve_Key", on_off(f.preserve_key));
                if f.unescape_key {
                    self.entry(out, "Unescape_Key", on_off(true));
                }
            }
            FilterRecord::Nest(f) => {
                if let Some(op) = f.operation {
                    self.entry(out, "Operation", op.as_str());
                }
                self.opt(out, "Wildcard", f.wildcard.as_deref());
                self.opt(out, "Nest_under", f.nest_under.as_deref());
                self.opt(out, "Nested_under", f.nested_under.as_deref());
                self.opt(out, "Remove_prefix", f.remove_prefix.as_deref());
                self.opt(out, "Add_prefix", f.add_prefix.as_deref());
            }
        }
    }

    fn entry(&self, out: &mut String, key: &str, value: &str) {
        // String에 대한 fmt::Write는 실패하지 않음
        let _ = writeln!(
            out,
            "{:indent$}{:<width$} {}",
            "",
            key,
            value,
            indent = self.indent,
            width = self.key_width
        );
    }

    fn opt(&self, out: &mut String, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.entry(out, key, value);
        }
    }
}

/// 파서의 `filter` 바인딩을 `parser` 필터 레코드로 변환합니다.
pub fn binding_filters(parsers: &[ParserRecord]) -> Vec<FilterRecord> {
    parsers
        .iter()
        .filter_map(|parser| {
            let binding = parser.filter.as_ref()?;
            Some(FilterRecord::Parser(ParserFilter {
                match_pattern: binding
                    .match_pattern
                    .clone()
                    .unwrap_or_else(|| DEFAULT_BINDING_MATCH.to_owned()),
                key_name: Some(
                    binding
                        .key_name
                        .clone()
                        .unwrap_or_else(|| DEFAULT_BINDING_KEY.to_owned()),
                ),
                parsers: vec![parser.name.clone()],
                reserve_data: binding.reserve_data,
                preserve_key: binding.preserve_key,
                unescape_key: binding.unescape_key,
            }))
        })
        .collect()
}

fn on_off(value: bool) -> &'static str {
    if value { "On" } else { "Off" }
}
