// ═══════════════════════════════════════════════════════════════════
// Provider Tests — CoinGeckoProvider against a local HTTP stub
// ═══════════════════════════════════════════════════════════════════

use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crypto_portfolio_core::errors::CoreError;
use crypto_portfolio_core::models::settings::DEFAULT_BASE_URL;
use crypto_portfolio_core::providers::coingecko::CoinGeckoProvider;
use crypto_portfolio_core::providers::traits::MarketDataProvider;

// ═══════════════════════════════════════════════════════════════════
// Test Helpers — one-shot HTTP stub
// ═══════════════════════════════════════════════════════════════════

/// Serve `status` + `body` to each of the next `times` connections.
/// Returns the base URL and the request lines received.
async fn stub_server(status: &'static str, body: &str, times: usize) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_task = Arc::clone(&seen);
    let body = body.to_string();

    tokio::spawn(async move {
        for _ in 0..times {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut buf = vec![0u8; 8192];
            let n = socket.read(&mut buf).await.unwrap_or(0);
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            if let Some(line) = request.lines().next() {
                seen_task.lock().unwrap().push(line.to_string());
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{addr}"), seen)
}

const TWO_COINS: &str = r#"[
    {"id":"bitcoin","symbol":"btc","name":"Bitcoin","current_price":50000,"market_cap_rank":1},
    {"id":"ethereum","symbol":"eth","name":"Ethereum","current_price":2500,"market_cap_rank":2,
     "price_change_percentage_24h":null}
]"#;

// ═══════════════════════════════════════════════════════════════════
// CoinGeckoProvider — construction and URLs
// ═══════════════════════════════════════════════════════════════════

mod construction {
    use super::*;

    #[test]
    fn name() {
        assert_eq!(CoinGeckoProvider::new().name(), "CoinGecko");
    }

    #[test]
    fn default_uses_public_api() {
        let provider = CoinGeckoProvider::default();
        assert_eq!(provider.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let provider = CoinGeckoProvider::with_base_url("http://localhost:9000/api/v3/", 5);
        assert_eq!(provider.base_url(), "http://localhost:9000/api/v3");
    }

    #[test]
    fn markets_url_carries_listing_parameters() {
        let provider = CoinGeckoProvider::new();
        assert_eq!(
            provider.markets_url("usd", 20, 1),
            "https://api.coingecko.com/api/v3/coins/markets?vs_currency=usd&order=market_cap_desc&per_page=20&page=1&sparkline=false&locale=en"
        );
    }

    #[test]
    fn provider_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CoinGeckoProvider>();
    }

    #[test]
    fn boxes_as_trait_object() {
        let boxed: Box<dyn MarketDataProvider> = Box::new(CoinGeckoProvider::new());
        assert_eq!(boxed.name(), "CoinGecko");
    }
}

// ═══════════════════════════════════════════════════════════════════
// CoinGeckoProvider — get_markets
// ═══════════════════════════════════════════════════════════════════

mod get_markets {
    use super::*;

    #[tokio::test]
    async fn parses_successful_listing() {
        let (url, seen) = stub_server("200 OK", TWO_COINS, 1).await;
        let provider = CoinGeckoProvider::with_base_url(url, 5);

        let coins = provider.get_markets("usd", 20, 1).await.unwrap();
        assert_eq!(coins.len(), 2);
        assert_eq!(coins[0].id, "bitcoin");
        assert_eq!(coins[1].current_price, Some(2500.0));
        assert_eq!(coins[1].price_change_percentage_24h, None);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].starts_with("GET /coins/markets?vs_currency=usd&order=market_cap_desc&per_page=20&page=1"));
    }

    #[tokio::test]
    async fn non_success_status_is_api_error() {
        let (url, _) = stub_server("429 Too Many Requests", "{}", 1).await;
        let provider = CoinGeckoProvider::with_base_url(url, 5);

        let err = provider.get_markets("usd", 20, 1).await.unwrap_err();
        match err {
            CoreError::Api { provider, message } => {
                assert_eq!(provider, "CoinGecko");
                assert_eq!(message, "HTTP error! status: 429");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn server_error_is_api_error() {
        let (url, _) = stub_server("500 Internal Server Error", "", 1).await;
        let provider = CoinGeckoProvider::with_base_url(url, 5);
        let err = provider.get_markets("usd", 10, 1).await.unwrap_err();
        assert!(err.to_string().contains("status: 500"));
    }

    #[tokio::test]
    async fn malformed_body_is_api_error() {
        let (url, _) = stub_server("200 OK", r#"{"status":{"error_code":1}}"#, 1).await;
        let provider = CoinGeckoProvider::with_base_url(url, 5);
        let err = provider.get_markets("usd", 20, 1).await.unwrap_err();
        assert!(matches!(err, CoreError::Api { .. }));
    }

    #[tokio::test]
    async fn connection_refused_is_network_error() {
        // Reserve a port, then free it so nothing is listening there.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = CoinGeckoProvider::with_base_url(format!("http://{addr}"), 5);
        let err = provider.get_markets("usd", 20, 1).await.unwrap_err();
        match err {
            CoreError::Network(msg) => assert!(!msg.contains("vs_currency")),
            other => panic!("expected Network error, got {other:?}"),
        }
    }
}
