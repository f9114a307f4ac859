//! 필터 match 템플릿 치환
//!
//! 기술 테이블의 필터는 `*{container}*` 형태의 템플릿을 가집니다.
//! 로그 소스마다 컨테이너 이름을 넣고 연속된 `*`를 하나로 합쳐,
//! 와일드카드 컨테이너는 `*`, `app` 컨테이너는 `*app*`가 됩니다.

use logconf_core::types::CONTAINER_PLACEHOLDER;

/// 기술 테이블에서 쓰는 기본 match 템플릿
pub const DEFAULT_MATCH_TEMPLATE: &str = "*{container}*";

/// 템플릿의 자리표시자를 컨테이너 이름으로 치환합니다.
pub fn expand_match(template: &str, container: &str) -> String {
    let expanded = template.replace(CONTAINER_PLACEHOLDER, container);
    collapse_wildcards(&expanded)
}

/// 연속된 `*`를 하나로 합칩니다.
fn collapse_wildcards(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut prev_star = false;
    for c in pattern.chars() {
        if c == '*' {
            if prev_star {
                continue;
            }
            prev_star = true;
        } else {
            prev_star = false;
        }
        out.push(c);
    }
    out
}
