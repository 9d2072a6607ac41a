/*
[INPUT]:  Configured RPC URLs keyed by chain slug and chain id
[OUTPUT]: The RPC endpoint for a transaction's chain
[POS]:    Execution layer - RPC endpoint lookup
[UPDATE]: When endpoint lookup rules change
*/

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

/// RPC endpoints used to build dedicated per-chain signing clients
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RpcEndpoints {
    pub by_chain_slug: HashMap<String, Url>,
    pub by_chain_id: HashMap<u64, Url>,
}

impl RpcEndpoints {
    pub fn new(by_chain_slug: HashMap<String, Url>, by_chain_id: HashMap<u64, Url>) -> Self {
        Self {
            by_chain_slug,
            by_chain_id,
        }
    }

    pub fn with_chain_slug(mut self, chain_slug: impl Into<String>, url: Url) -> Self {
        self.by_chain_slug.insert(chain_slug.into(), url);
        self
    }

    pub fn with_chain_id(mut self, chain_id: u64, url: Url) -> Self {
        self.by_chain_id.insert(chain_id, url);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.by_chain_slug.is_empty() && self.by_chain_id.is_empty()
    }

    /// Slug match first, then chain id
    pub fn resolve(&self, chain_slug: Option<&str>, chain_id: u64) -> Option<&Url> {
        chain_slug
            .and_then(|slug| self.by_chain_slug.get(slug))
            .or_else(|| self.by_chain_id.get(&chain_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn test_slug_takes_precedence() {
        let endpoints = RpcEndpoints::default()
            .with_chain_slug("base", url("https://slug.example/"))
            .with_chain_id(8453, url("https://id.example/"));

        assert_eq!(
            endpoints.resolve(Some("base"), 8453),
            Some(&url("https://slug.example/"))
        );
        assert_eq!(
            endpoints.resolve(Some("unknown"), 8453),
            Some(&url("https://id.example/"))
        );
        assert_eq!(endpoints.resolve(None, 1), None);
    }
}
