/*
[INPUT]:  Configured fallback values and outgoing requests
[OUTPUT]: Requests with defaults filled where the caller left them empty
[POS]:    Defaults layer - request mutation before signing/dispatch
[UPDATE]: When new configurable defaults are added
*/

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::types::serde_helpers;
use crate::types::{Builder, CreateTokenAction, GetTokensV2Params};

/// Builder attribution applied when a request carries none
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderDefaults {
    #[serde(
        serialize_with = "serde_helpers::serialize_checksummed",
        deserialize_with = "serde_helpers::deserialize_address"
    )]
    pub code: Address,
    #[serde(default)]
    pub fee: Option<u64>,
}

/// Fallback values injected into outgoing requests. Never overrides caller input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenLayerDefaults {
    pub builder: Option<BuilderDefaults>,
}

impl TokenLayerDefaults {
    pub fn with_builder(code: Address, fee: Option<u64>) -> Self {
        Self {
            builder: Some(BuilderDefaults { code, fee }),
        }
    }

    /// Fill `builder` as `{code, fee: fee or 0}` when absent
    pub fn apply_to_create_token(&self, mut action: CreateTokenAction) -> CreateTokenAction {
        if action.builder.is_none() {
            if let Some(defaults) = self.builder {
                action.builder = Some(Builder {
                    code: defaults.code,
                    fee: Some(defaults.fee.unwrap_or(0)),
                });
            }
        }
        action
    }

    /// Fill `builder_code` when absent
    pub fn apply_to_get_tokens_v2(&self, mut params: GetTokensV2Params) -> GetTokensV2Params {
        if params.builder_code.is_none() {
            params.builder_code = self.builder.map(|defaults| defaults.code);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn beef() -> Address {
        Address::from_str("0xBEEF000000000000000000000000000000BEEF").unwrap()
    }

    #[test]
    fn test_create_token_injects_builder() {
        let defaults = TokenLayerDefaults::with_builder(beef(), Some(250));
        let action = defaults.apply_to_create_token(CreateTokenAction::default());
        assert_eq!(
            action.builder,
            Some(Builder {
                code: beef(),
                fee: Some(250)
            })
        );
    }

    #[test]
    fn test_missing_fee_defaults_to_zero() {
        let defaults = TokenLayerDefaults::with_builder(beef(), None);
        let action = defaults.apply_to_create_token(CreateTokenAction::default());
        assert_eq!(action.builder.unwrap().fee, Some(0));
    }

    #[test]
    fn test_explicit_values_win() {
        let defaults = TokenLayerDefaults::with_builder(beef(), Some(250));
        let explicit = Builder {
            code: Address::ZERO,
            fee: Some(1),
        };
        let action = defaults.apply_to_create_token(CreateTokenAction {
            builder: Some(explicit.clone()),
            ..CreateTokenAction::default()
        });
        assert_eq!(action.builder, Some(explicit));

        let params = defaults.apply_to_get_tokens_v2(GetTokensV2Params {
            builder_code: Some(Address::ZERO),
            ..GetTokensV2Params::default()
        });
        assert_eq!(params.builder_code, Some(Address::ZERO));
    }

    #[test]
    fn test_get_tokens_v2_injects_builder_code() {
        let defaults = TokenLayerDefaults::with_builder(beef(), Some(250));
        let params = defaults.apply_to_get_tokens_v2(GetTokensV2Params::default());
        assert_eq!(params.builder_code, Some(beef()));

        let untouched = TokenLayerDefaults::default().apply_to_get_tokens_v2(GetTokensV2Params::default());
        assert_eq!(untouched.builder_code, None);
    }

    #[test]
    fn test_defaults_deserialize() {
        let defaults: TokenLayerDefaults = serde_json::from_value(serde_json::json!({
            "builder": {"code": "0xbeef000000000000000000000000000000beef", "fee": 250}
        }))
        .unwrap();
        assert_eq!(defaults, TokenLayerDefaults::with_builder(beef(), Some(250)));
    }
}
