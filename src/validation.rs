//! # 域名语法校验

use regex::Regex;
use std::sync::LazyLock;

/// 单个标签：字母数字开头结尾，中间允许连字符，最长 63
static DOMAIN_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(?i)([a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])$").ok()
});

/// 域名最大总长度
const MAX_DOMAIN_LEN: usize = 253;

/// 校验主机名语法（至少两个标签，不含通配符）
#[must_use]
pub fn validate_domain(domain: &str) -> bool {
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    !domain.is_empty() && domain.len() <= MAX_DOMAIN_LEN && DOMAIN_RE.as_ref().is_some_and(|re| re.is_match(domain))
}
