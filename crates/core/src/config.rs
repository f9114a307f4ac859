//! 설정 관리 -- logconf.toml 파싱 및 런타임 설정
//!
//! [`LogconfConfig`]는 로깅 설정(`[general]`)과 모듈 입력(`[module]`)을 담는
//! 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`LOGCONF_MODULE_LOG_SOURCES=php:app,nginx:web` 형식)
//! 3. 설정 파일 (`logconf.toml`, `.yaml`/`.yml`, `.json`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), logconf_core::error::LogconfError> {
//! use logconf_core::config::LogconfConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = LogconfConfig::load("logconf.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = LogconfConfig::parse("[module]\nname = \"api\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, LogconfError};
use crate::types::{LogSource, ModuleInput};

/// 허용되는 로그 레벨
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// 허용되는 로그 출력 형식
pub const LOG_FORMATS: [&str; 2] = ["json", "pretty"];

/// 설정 파일 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML (기본값)
    Toml,
    /// YAML
    Yaml,
    /// JSON
    Json,
}

impl ConfigFormat {
    /// 파일 확장자로 형식을 판별합니다. 확장자가 없으면 TOML로 간주합니다.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            None | Some("toml") => Ok(Self::Toml),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            Some(other) => Err(ConfigError::UnsupportedFormat(other.to_owned())),
        }
    }
}

/// logconf 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogconfConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 모듈 입력
    #[serde(default)]
    pub module: ModuleInput,
}

impl LogconfConfig {
    /// 설정 파일을 로드하고 환경변수 오버라이드를 적용합니다.
    ///
    /// 설정 로딩 순서:
    /// 1. 파일 파싱 (확장자로 형식 판별)
    /// 2. 환경변수 오버라이드 적용
    /// 3. 유효성 검증
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LogconfError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 설정 파일을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LogconfError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LogconfError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LogconfError::Io(e)
            }
        })?;
        let config = Self::parse_as(&content, format)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, LogconfError> {
        Self::parse_as(toml_str, ConfigFormat::Toml)
    }

    /// 지정한 형식의 문자열에서 설정을 파싱합니다.
    pub fn parse_as(content: &str, format: ConfigFormat) -> Result<Self, LogconfError> {
        let result = match format {
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        };
        result.map_err(|reason| LogconfError::Config(ConfigError::ParseFailed { reason }))
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGCONF_{SECTION}_{FIELD}`
    /// 예: `LOGCONF_GENERAL_LOG_LEVEL=debug`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "LOGCONF_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "LOGCONF_GENERAL_LOG_FORMAT");

        // Module
        override_string(&mut self.module.name, "LOGCONF_MODULE_NAME");
        override_log_sources(&mut self.module.log_sources, "LOGCONF_MODULE_LOG_SOURCES");
    }

    /// 설정값의 유효성을 검증합니다.
    ///
    /// 모듈 입력(`[module]`)의 의미 검증은 조합 단계에서 수행합니다.
    pub fn validate(&self) -> Result<(), LogconfError> {
        // log_level 검증
        if !LOG_LEVELS.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", LOG_LEVELS.join(", ")),
            }
            .into());
        }

        // log_format 검증
        if !LOG_FORMATS.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", LOG_FORMATS.join(", ")),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

/// `tech[:container]` 항목을 쉼표로 구분한 목록으로 로그 소스를 교체합니다.
///
/// 컨테이너가 생략된 항목은 `*`가 됩니다. 빈 항목은 무시합니다.
fn override_log_sources(target: &mut Vec<LogSource>, env_key: &str) {
    let Ok(val) = std::env::var(env_key) else {
        return;
    };

    let mut sources = Vec::new();
    for entry in val.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let source = match entry.split_once(':') {
            Some((name, container)) if !container.trim().is_empty() => {
                LogSource::new(name.trim(), container.trim())
            }
            Some((name, _)) => {
                warn!(
                    env_key,
                    entry, "empty container in log source override, using wildcard"
                );
                LogSource::any_container(name.trim())
            }
            None => LogSource::any_container(entry),
        };
        sources.push(source);
    }
    *target = sources;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FilterRecord;
    use serial_test::serial;

    #[test]
    fn default_config_is_valid() {
        let config = LogconfConfig::default();
        config.validate().unwrap();
        assert!(config.module.log_sources.is_empty());
    }

    #[test]
    fn parse_full_toml() {
        let toml = r#"
[general]
log_level = "debug"
log_format = "json"

[module]
name = "api"

[module.context]
namespace = "luscii"
stage = "production"

[[module.log_sources]]
name = "php"
container = "app"

[[module.log_sources]]
name = "nginx"

[[module.custom_parsers]]
name = "custom_regex"
format = "regex"
regex = "^(?<message>.*)$"

[[module.custom_filters]]
name = "grep"
match = "*app*"
exclude = "log healthcheck"
"#;
        let config = LogconfConfig::parse(toml).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.module.name, "api");
        assert_eq!(config.module.log_sources.len(), 2);
        assert_eq!(config.module.log_sources[0].container, "app");
        assert_eq!(config.module.log_sources[1].container, "*");
        assert_eq!(config.module.custom_parsers[0].name, "custom_regex");
        assert!(matches!(
            config.module.custom_filters[0],
            FilterRecord::Grep(_)
        ));
        let context = config.module.context.as_ref().unwrap();
        assert_eq!(context["stage"], "production");
    }

    #[test]
    fn parse_yaml_and_json() {
        let yaml = r#"
module:
  name: worker
  log_sources:
    - name: dotnet
      container: worker
"#;
        let config = LogconfConfig::parse_as(yaml, ConfigFormat::Yaml).unwrap();
        assert_eq!(config.module.log_sources[0].name, "dotnet");

        let json = r#"{"module":{"name":"worker","log_sources":[{"name":"datadog"}]}}"#;
        let config = LogconfConfig::parse_as(json, ConfigFormat::Json).unwrap();
        assert_eq!(config.module.log_sources[0].container, "*");
        assert_eq!(config.general.log_level, "warn");
    }

    #[test]
    fn parse_invalid_toml_returns_error() {
        let result = LogconfConfig::parse("invalid = [[[toml");
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            LogconfError::Config(ConfigError::ParseFailed { .. })
        ));
    }

    #[test]
    fn parse_unknown_filter_name_fails() {
        let toml = r#"
[[module.custom_filters]]
name = "lua"
match = "*"
"#;
        assert!(LogconfConfig::parse(toml).is_err());
    }

    #[test]
    fn format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("logconf.toml")).unwrap(),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("logconf.yml")).unwrap(),
            ConfigFormat::Yaml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("logconf.json")).unwrap(),
            ConfigFormat::Json
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("logconf")).unwrap(),
            ConfigFormat::Toml
        );
        assert!(ConfigFormat::from_path(Path::new("logconf.ini")).is_err());
    }

    #[test]
    fn validate_rejects_invalid_log_level() {
        let mut config = LogconfConfig::default();
        config.general.log_level = "verbose".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_level"));
    }

    #[test]
    fn validate_rejects_invalid_log_format() {
        let mut config = LogconfConfig::default();
        config.general.log_format = "xml".to_owned();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("log_format"));
    }

    #[test]
    #[serial]
    fn env_override_string() {
        let mut val = "original".to_owned();
        // SAFETY: #[serial]로 환경변수를 다루는 테스트를 직렬화합니다.
        unsafe { std::env::set_var("TEST_LOGCONF_STR", "overridden") };
        override_string(&mut val, "TEST_LOGCONF_STR");
        assert_eq!(val, "overridden");
        unsafe { std::env::remove_var("TEST_LOGCONF_STR") };
    }

    #[test]
    #[serial]
    fn env_override_log_sources() {
        let mut sources = vec![LogSource::any_container("php")];
        // SAFETY: #[serial]로 환경변수를 다루는 테스트를 직렬화합니다.
        unsafe { std::env::set_var("TEST_LOGCONF_SOURCES", "nginx:web, datadog, ,dotnet:") };
        override_log_sources(&mut sources, "TEST_LOGCONF_SOURCES");
        assert_eq!(
            sources,
            vec![
                LogSource::new("nginx", "web"),
                LogSource::any_container("datadog"),
                LogSource::any_container("dotnet"),
            ]
        );
        unsafe { std::env::remove_var("TEST_LOGCONF_SOURCES") };
    }

    #[test]
    fn env_override_missing_var_keeps_original() {
        let mut sources = vec![LogSource::new("php", "app")];
        override_log_sources(&mut sources, "TEST_LOGCONF_NONEXISTENT_12345");
        assert_eq!(sources, vec![LogSource::new("php", "app")]);
    }

    #[test]
    fn config_serialize_roundtrip() {
        let mut config = LogconfConfig::default();
        config.module.name = "api".to_owned();
        config.module.log_sources.push(LogSource::new("php", "app"));
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = LogconfConfig::parse(&toml_str).unwrap();
        assert_eq!(parsed.module, config.module);
        assert_eq!(parsed.general.log_level, config.general.log_level);
    }

    #[tokio::test]
    async fn from_file_not_found() {
        let result = LogconfConfig::from_file("/nonexistent/path/logconf.toml").await;
        let err = result.unwrap_err();
        assert!(matches!(
            err,
            LogconfError::Config(ConfigError::FileNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn from_file_reads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logconf.yaml");
        std::fs::write(&path, "module:\n  name: api\n").unwrap();
        let config = LogconfConfig::from_file(&path).await.unwrap();
        assert_eq!(config.module.name, "api");
    }
}
