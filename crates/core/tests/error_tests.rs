// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError display and conversions
// ═══════════════════════════════════════════════════════════════════

use crypto_portfolio_core::errors::CoreError;
use crypto_portfolio_core::models::coin::MarketCoin;

mod display {
    use super::*;

    #[test]
    fn api_error() {
        let err = CoreError::Api {
            provider: "CoinGecko".into(),
            message: "HTTP error! status: 429".into(),
        };
        assert_eq!(err.to_string(), "API error (CoinGecko): HTTP error! status: 429");
    }

    #[test]
    fn network_error() {
        let err = CoreError::Network("connection refused".into());
        assert_eq!(err.to_string(), "Network error: connection refused");
    }

    #[test]
    fn deserialization_error() {
        let err = CoreError::Deserialization("expected value".into());
        assert_eq!(err.to_string(), "Deserialization error: expected value");
    }

    #[test]
    fn validation_error() {
        let err = CoreError::ValidationError("amount must be positive".into());
        assert_eq!(err.to_string(), "Holding validation failed: amount must be positive");
    }

    #[test]
    fn holding_not_found() {
        let err = CoreError::HoldingNotFound("abc".into());
        assert_eq!(err.to_string(), "Holding not found: abc");
    }

    #[test]
    fn config_error() {
        let err = CoreError::Config("listing_limit must be positive".into());
        assert_eq!(err.to_string(), "Invalid configuration: listing_limit must be positive");
    }
}

mod conversions {
    use super::*;

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<Vec<MarketCoin>>("not json").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
        assert!(err.to_string().starts_with("Deserialization error:"));
    }

    #[tokio::test]
    async fn from_reqwest_error_redacts_query() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let reqwest_err = reqwest::Client::new()
            .get(format!("http://{addr}/coins/markets?vs_currency=usd&secret=1"))
            .send()
            .await
            .unwrap_err();
        let err: CoreError = reqwest_err.into();
        match err {
            CoreError::Network(msg) => {
                assert!(!msg.contains("secret"));
            }
            other => panic!("expected Network error, got {other:?}"),
        }
    }

    #[test]
    fn errors_are_send_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<CoreError>();
    }
}
