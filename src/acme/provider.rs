//! # CA 提供方

use std::fmt;
use std::str::FromStr;

use crate::error::OrchestratorError;

/// 支持的 ACME CA 提供方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AcmeProvider {
    /// Let's Encrypt 生产环境
    LetsEncrypt,
    /// Let's Encrypt 测试环境
    LetsEncryptTest,
    /// Buypass 生产环境
    Buypass,
    /// Buypass 测试环境
    BuypassTest,
    /// ZeroSSL
    ZeroSsl,
}

impl AcmeProvider {
    /// 全部提供方
    pub const ALL: [Self; 5] = [
        Self::LetsEncrypt,
        Self::LetsEncryptTest,
        Self::Buypass,
        Self::BuypassTest,
        Self::ZeroSsl,
    ];

    /// 配置中使用的键
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::LetsEncrypt => "letsencrypt",
            Self::LetsEncryptTest => "letsencrypt_test",
            Self::Buypass => "buypass",
            Self::BuypassTest => "buypass_test",
            Self::ZeroSsl => "zerossl",
        }
    }

    /// ACME 目录 URL
    #[must_use]
    pub const fn directory_url(self) -> &'static str {
        match self {
            Self::LetsEncrypt => "https://acme-v02.api.letsencrypt.org/directory",
            Self::LetsEncryptTest => "https://acme-staging-v02.api.letsencrypt.org/directory",
            Self::Buypass => "https://api.buypass.com/acme/directory",
            Self::BuypassTest => "https://api.test4.buypass.no/acme/directory",
            Self::ZeroSsl => "https://acme.zerossl.com/v2/DV90",
        }
    }

    /// 是否需要附加 `--staging`
    ///
    /// 只有 Let's Encrypt 的测试环境需要；Buypass 测试环境通过目录 URL 区分。
    #[must_use]
    pub const fn is_staging(self) -> bool {
        matches!(self, Self::LetsEncryptTest)
    }
}

impl FromStr for AcmeProvider {
    type Err = OrchestratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.key() == s.trim())
            .ok_or_else(|| crate::config_error!("未知的 ACME 提供方: {}", s))
    }
}

impl fmt::Display for AcmeProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("letsencrypt", "https://acme-v02.api.letsencrypt.org/directory")]
    #[case("letsencrypt_test", "https://acme-staging-v02.api.letsencrypt.org/directory")]
    #[case("buypass", "https://api.buypass.com/acme/directory")]
    #[case("buypass_test", "https://api.test4.buypass.no/acme/directory")]
    #[case("zerossl", "https://acme.zerossl.com/v2/DV90")]
    fn test_provider_table(#[case] key: &str, #[case] url: &str) {
        let provider: AcmeProvider = key.parse().unwrap();
        assert_eq!(provider.directory_url(), url);
        assert_eq!(provider.to_string(), key);
    }

    #[test]
    fn test_unknown_provider_is_config_error() {
        let err = "digicert".parse::<AcmeProvider>().unwrap_err();
        assert!(matches!(err, OrchestratorError::Config { .. }));
    }

    #[test]
    fn test_only_letsencrypt_test_is_staging() {
        let staging: Vec<_> = AcmeProvider::ALL.into_iter().filter(|p| p.is_staging()).collect();
        assert_eq!(staging, vec![AcmeProvider::LetsEncryptTest]);
    }
}
