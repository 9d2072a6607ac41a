/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust enums with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use std::fmt;

use serde::{Deserialize, Serialize};

/// Network the action is executed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Source {
    #[default]
    Mainnet,
    Testnet,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Mainnet => "Mainnet",
            Source::Testnet => "Testnet",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action tag carried as `action.type` on requests and `actionType` on responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
    Register,
    CreateToken,
    TradeToken,
    SendTransaction,
    TransferToken,
    ClaimRewards,
    CreateReferralCode,
    EnterReferralCode,
    MintUsd,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Register => "register",
            ActionType::CreateToken => "createToken",
            ActionType::TradeToken => "tradeToken",
            ActionType::SendTransaction => "sendTransaction",
            ActionType::TransferToken => "transferToken",
            ActionType::ClaimRewards => "claimRewards",
            ActionType::CreateReferralCode => "createReferralCode",
            ActionType::EnterReferralCode => "enterReferralCode",
            ActionType::MintUsd => "mintUsd",
        }
    }

    /// Actions that can only be authorized with a bearer token.
    pub fn is_bearer_only(&self) -> bool {
        !matches!(self, ActionType::Register | ActionType::CreateToken)
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Query tag for the info endpoint (`type` on both request and response).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InfoType {
    GetTokensV2,
    QuoteToken,
    Me,
    GetPoolData,
    GetUserBalance,
    SearchToken,
    CheckTokenOwnership,
    GetUserFees,
    GetUserFeeHistory,
    GetLeaderboard,
    GetUserPortfolio,
}

impl InfoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::GetTokensV2 => "getTokensV2",
            InfoType::QuoteToken => "quoteToken",
            InfoType::Me => "me",
            InfoType::GetPoolData => "getPoolData",
            InfoType::GetUserBalance => "getUserBalance",
            InfoType::SearchToken => "searchToken",
            InfoType::CheckTokenOwnership => "checkTokenOwnership",
            InfoType::GetUserFees => "getUserFees",
            InfoType::GetUserFeeHistory => "getUserFeeHistory",
            InfoType::GetLeaderboard => "getLeaderboard",
            InfoType::GetUserPortfolio => "getUserPortfolio",
        }
    }

    /// How the query is authorized.
    pub fn access(&self) -> InfoAccess {
        match self {
            InfoType::QuoteToken => InfoAccess::Public,
            InfoType::GetTokensV2
            | InfoType::GetPoolData
            | InfoType::SearchToken
            | InfoType::CheckTokenOwnership
            | InfoType::GetLeaderboard => InfoAccess::OptionalBearer,
            InfoType::Me
            | InfoType::GetUserBalance
            | InfoType::GetUserFees
            | InfoType::GetUserFeeHistory
            | InfoType::GetUserPortfolio => InfoAccess::Bearer,
        }
    }
}

impl fmt::Display for InfoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authorization requirement of an info query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoAccess {
    /// Always sent anonymously.
    Public,
    /// Anonymous unless a bearer credential is configured.
    OptionalBearer,
    /// Requires a JWT or API key.
    Bearer,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_type_serde_matches_as_str() {
        for action in [
            ActionType::Register,
            ActionType::CreateToken,
            ActionType::TradeToken,
            ActionType::SendTransaction,
            ActionType::TransferToken,
            ActionType::ClaimRewards,
            ActionType::CreateReferralCode,
            ActionType::EnterReferralCode,
            ActionType::MintUsd,
        ] {
            let encoded = serde_json::to_value(action).unwrap();
            assert_eq!(encoded, serde_json::json!(action.as_str()));
        }
    }

    #[test]
    fn test_info_type_serde_matches_as_str() {
        let encoded = serde_json::to_value(InfoType::GetTokensV2).unwrap();
        assert_eq!(encoded, serde_json::json!("getTokensV2"));
        let encoded = serde_json::to_value(InfoType::GetUserFeeHistory).unwrap();
        assert_eq!(encoded, serde_json::json!("getUserFeeHistory"));
    }

    #[test]
    fn test_bearer_only_actions() {
        assert!(!ActionType::Register.is_bearer_only());
        assert!(!ActionType::CreateToken.is_bearer_only());
        assert!(ActionType::MintUsd.is_bearer_only());
    }

    #[test]
    fn test_source_wire_format() {
        assert_eq!(serde_json::to_value(Source::Testnet).unwrap(), "Testnet");
        assert_eq!(Source::default(), Source::Mainnet);
    }
}
