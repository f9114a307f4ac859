#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`technology`]: 기술별(php, nginx, datadog, dotnet) 파서/필터 정의와 레지스트리
//! - [`defaults`]: 항상 출력되는 기본 JSON 파서 세트
//! - [`pattern`]: 필터 match 템플릿의 컨테이너 치환
//! - [`aggregator`]: 기술 테이블 + 사용자 정의 레코드 병합
//! - [`module`]: 입력 검증과 출력 생성 (공개 인터페이스)
//! - [`render`]: Fluent Bit `[PARSER]` / `[FILTER]` 스탠자 렌더링
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! ModuleInput -> LogConfigModule::validate -> Aggregator -> ModuleOutput -> FluentBitRenderer
//!                                                 |
//!                         TechnologyRegistry + default_parsers + custom records
//! ```

pub mod aggregator;
pub mod defaults;
pub mod error;
pub mod module;
pub mod pattern;
pub mod render;
pub mod technology;

// --- 주요 타입 re-export ---

// 공개 인터페이스
pub use module::{LogConfigModule, evaluate};

// 조합기
pub use aggregator::Aggregator;

// 에러
pub use error::ComposeError;

// 기술 정의
pub use technology::{
    DatadogTechnology, DotnetTechnology, NginxTechnology, PhpTechnology, TechnologyRegistry,
    TechnologySummary,
};

// 렌더러
pub use render::FluentBitRenderer;
