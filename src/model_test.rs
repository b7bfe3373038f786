use super::*;

// =============================================================================
// enumerations
// =============================================================================

#[test]
fn platform_defaults_to_first_value() {
    assert_eq!(Platform::default(), Platform::Binance);
    assert_eq!(Platform::default(), Platform::ALL[0]);
}

#[test]
fn chain_defaults_to_first_value() {
    assert_eq!(Chain::default(), Chain::Bnb);
}

#[test]
fn platform_parses_loosely() {
    assert_eq!("binance".parse::<Platform>(), Ok(Platform::Binance));
    assert_eq!("trust-wallet".parse::<Platform>(), Ok(Platform::TrustWallet));
    assert_eq!("Trust Wallet".parse::<Platform>(), Ok(Platform::TrustWallet));
    assert_eq!("mexc".parse::<Platform>(), Ok(Platform::Mexc));
    assert_eq!("Coinbase".parse::<Platform>(), Err(UnknownValue("Coinbase".to_owned())));
}

#[test]
fn chain_parses_case_insensitively() {
    assert_eq!("trc20".parse::<Chain>(), Ok(Chain::Trc20));
    assert_eq!("SOL".parse::<Chain>(), Ok(Chain::Sol));
    assert!("ETH".parse::<Chain>().is_err());
}

#[test]
fn enumeration_labels_match_serialized_form() {
    for platform in Platform::ALL {
        let json = serde_json::to_value(platform).unwrap();
        assert_eq!(json, serde_json::json!(platform.as_str()));
    }
    for chain in Chain::ALL {
        let json = serde_json::to_value(chain).unwrap();
        assert_eq!(json, serde_json::json!(chain.as_str()));
    }
}

// =============================================================================
// WalletRecord decoding
// =============================================================================

#[test]
fn record_decodes_postgrest_row() {
    let row = serde_json::json!({
        "id": "2f1c",
        "user_id": "u1",
        "name": "Trading",
        "platform": "Trust Wallet",
        "purpose": "airdrops",
        "chain": "SOL",
        "address": "So1addr",
        "private_key": null,
        "email": "me@example.com",
        "created_at": "2025-01-01T00:00:00Z"
    });
    let record: WalletRecord = serde_json::from_value(row).unwrap();
    assert_eq!(record.id, "2f1c");
    assert_eq!(record.platform, Stored::Known(Platform::TrustWallet));
    assert_eq!(record.chain, Stored::Known(Chain::Sol));
    assert_eq!(record.private_key, None);
    assert_eq!(record.email.as_deref(), Some("me@example.com"));
}

#[test]
fn record_keeps_numeric_id_as_string() {
    let row = serde_json::json!({
        "id": 42,
        "name": "n",
        "platform": "Binance",
        "chain": "BNB",
        "address": "a"
    });
    let record: WalletRecord = serde_json::from_value(row).unwrap();
    assert_eq!(record.id, "42");
    assert_eq!(record.purpose, "");
}

#[test]
fn record_keeps_unrecognized_enumeration_values() {
    let row = serde_json::json!({
        "id": "x",
        "name": "legacy",
        "platform": "Coinbase",
        "chain": "ETH",
        "address": "0x0"
    });
    let record: WalletRecord = serde_json::from_value(row).unwrap();
    assert_eq!(record.platform, Stored::Unrecognized("Coinbase".to_owned()));
    assert_eq!(record.platform.known(), None);
    assert_eq!(record.chain.to_string(), "ETH");
}

// =============================================================================
// NewWallet encoding
// =============================================================================

#[test]
fn new_wallet_serializes_absent_optionals_as_null() {
    let new = NewWallet {
        user_id: "u1".to_owned(),
        name: "Cold".to_owned(),
        platform: Platform::MetaMask,
        purpose: "savings".to_owned(),
        chain: Chain::Arb,
        address: "0xabc".to_owned(),
        private_key: None,
        email: None,
    };
    let json = serde_json::to_value(&new).unwrap();
    assert_eq!(json["platform"], "MetaMask");
    assert_eq!(json["chain"], "ARB");
    assert!(json["private_key"].is_null());
    assert!(json["email"].is_null());
    assert!(json.get("id").is_none());
}

#[test]
fn credentials_debug_redacts_password() {
    let creds = Credentials { email: "a@b.com".to_owned(), password: "hunter2".to_owned() };
    let debug = format!("{creds:?}");
    assert!(debug.contains("a@b.com"));
    assert!(!debug.contains("hunter2"));
}
