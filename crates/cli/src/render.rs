use std::fmt::Write;

use crypto_portfolio_core::models::coin::CoinSnapshot;
use crypto_portfolio_core::models::derived::PortfolioSummary;
use crypto_portfolio_core::views::format::{format_compact, format_currency, format_percentage};
use crypto_portfolio_core::views::holdings_table::{HoldingCard, HoldingsTable};
use crypto_portfolio_core::views::market_table::{CoinOption, MarketTablePage};

/// Plain-text market table with a footer like "1-20 of 20 coins".
pub(crate) fn market_page(page: &MarketTablePage<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5}  {:<20} {:<7} {:>14} {:>9} {:>9} {:>9} {:>20} {:>18} {:>10}",
        "Rank", "Name", "Symbol", "Price", "1h", "24h", "7d", "Market cap", "Volume 24h", "Supply"
    );
    for coin in &page.rows {
        let _ = writeln!(
            out,
            "{:>5}  {:<20} {:<7} {:>14} {:>9} {:>9} {:>9} {:>20} {:>18} {:>10}",
            format!("#{}", coin.rank),
            truncate(&coin.name, 20),
            coin.symbol,
            format_currency(coin.price),
            format_percentage(coin.price_change_1h),
            format_percentage(coin.price_change_1d),
            format_percentage(coin.price_change_1w),
            format_currency(coin.market_cap),
            format_currency(coin.volume),
            format_compact(coin.available_supply),
        );
    }
    let _ = writeln!(
        out,
        "{}-{} of {} coins (page {}/{}, {} total)",
        page.range.0,
        page.range.1,
        page.matching_count,
        page.page,
        page.page_count.max(1),
        page.total_count,
    );
    out
}

pub(crate) fn holding_cards(cards: &[HoldingCard]) -> String {
    let mut out = String::new();
    for card in cards {
        let arrow = if card.trend_up { "▲" } else { "▼" };
        let _ = writeln!(out, "{arrow} {}  {:.2} $", card.title, card.value);
        let _ = writeln!(out, "    Total profit : {:.2} $", card.total_profit);
        let _ = writeln!(out, "    Asset amount : {}", card.amount);
        let _ = writeln!(out, "    Difference   : {:.2} %", card.difference_pct);
    }
    out
}

pub(crate) fn holdings_table(table: &HoldingsTable<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Holdings: {} | Total value: {}",
        table.count,
        format_currency(table.total_value)
    );
    let _ = writeln!(
        out,
        "{:<20} {:>12} {:>14} {:>14} {:>16} {:>16} {:>9} {:<8} {:<10}",
        "Name", "Amount", "Bought at", "Current", "Value", "Profit", "Diff", "Status", "Date"
    );
    for row in &table.rows {
        let _ = writeln!(
            out,
            "{:<20} {:>12.4} {:>14} {:>14} {:>16} {:>16} {:>9} {:<8} {:<10}",
            truncate(&row.name, 20),
            row.amount,
            format_currency(row.price),
            format_currency(row.current_price()),
            format_currency(row.total_amount),
            format_currency(row.total_profit),
            format_percentage(row.grow_percent),
            if row.grow { "growing" } else { "falling" },
            row.date.format("%d.%m.%Y"),
        );
    }
    out
}

pub(crate) fn summary(summary: &PortfolioSummary) -> String {
    format!(
        "Portfolio value: {} | Invested: {} | Profit: {} ({})\n",
        format_currency(summary.total_value),
        format_currency(summary.total_invested),
        format_currency(summary.total_profit),
        format_percentage(summary.total_profit_pct),
    )
}

/// Coin selector entries, one "id  name" per line.
pub(crate) fn coin_options(options: &[CoinOption]) -> String {
    let mut out = String::new();
    for option in options {
        let _ = writeln!(out, "{:<24} {}", option.value, option.label);
    }
    out
}

/// Detail view of a single coin.
pub(crate) fn coin_info(coin: &CoinSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "({}) {}", coin.symbol, coin.name);
    if !coin.icon.is_empty() {
        let _ = writeln!(out, "Icon               : {}", coin.icon);
    }
    let _ = writeln!(out, "Rank               : #{}", coin.rank);
    let _ = writeln!(out, "Price              : {}", format_currency(coin.price));
    let _ = writeln!(out, "Price BTC          : {:.8}", coin.price_btc);
    let _ = writeln!(
        out,
        "Change 1h / 1d / 1w: {} / {} / {}",
        format_percentage(coin.price_change_1h),
        format_percentage(coin.price_change_1d),
        format_percentage(coin.price_change_1w),
    );
    let _ = writeln!(out, "Market cap         : {}", format_currency(coin.market_cap));
    let _ = writeln!(out, "Volume 24h         : {}", format_currency(coin.volume));
    let _ = writeln!(out, "Available supply   : {}", format_compact(coin.available_supply));
    let _ = writeln!(out, "Total supply       : {}", format_compact(coin.total_supply));
    if !coin.website_url.is_empty() {
        let _ = writeln!(out, "Website            : {}", coin.website_url);
    }
    let _ = writeln!(out, "Reddit             : {}", coin.reddit_url);
    let _ = writeln!(out, "Twitter            : {}", coin.twitter_url);
    for explorer in coin.explorers.iter().filter(|e| !e.is_empty()) {
        let _ = writeln!(out, "Explorer           : {explorer}");
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max.saturating_sub(1)).collect();
        t.push('…');
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypto_portfolio_core::models::coin::{MarketCoin, MarketCoinLinks, MarketListing};
    use crypto_portfolio_core::views::market_table::coin_options as build_options;

    fn listing() -> MarketListing {
        MarketListing::from_market(
            vec![
                MarketCoin {
                    id: "bitcoin".into(),
                    symbol: "btc".into(),
                    name: "Bitcoin".into(),
                    current_price: Some(50000.0),
                    market_cap_rank: Some(1),
                    links: Some(MarketCoinLinks {
                        homepage: vec!["https://bitcoin.org".into()],
                        blockchain_site: vec!["https://mempool.space".into(), String::new()],
                    }),
                    ..MarketCoin::default()
                },
                MarketCoin {
                    id: "ethereum".into(),
                    symbol: "eth".into(),
                    name: "Ethereum".into(),
                    current_price: Some(2500.0),
                    market_cap_rank: Some(2),
                    ..MarketCoin::default()
                },
            ],
            20,
        )
    }

    #[test]
    fn coin_info_shows_links_and_btc_price() {
        let listing = listing();
        let text = coin_info(listing.find("ethereum").unwrap());
        assert!(text.starts_with("(ETH) Ethereum\n"));
        assert!(text.contains("Price BTC          : 0.05000000"));
        assert!(text.contains("https://www.reddit.com/r/ethereum"));
        assert!(text.contains("https://twitter.com/ethereum"));
        assert!(!text.contains("Website"));

        let text = coin_info(listing.find("bitcoin").unwrap());
        assert!(text.contains("Website            : https://bitcoin.org"));
        assert_eq!(text.matches("Explorer").count(), 1);
    }

    #[test]
    fn coin_options_list_ids_in_listing_order() {
        let text = coin_options(&build_options(&listing()));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("bitcoin"));
        assert!(lines[0].ends_with("Bitcoin"));
        assert!(lines[1].starts_with("ethereum"));
    }

    #[test]
    fn truncate_marks_cut_names() {
        assert_eq!(truncate("Bitcoin", 20), "Bitcoin");
        assert_eq!(truncate("abcdef", 4), "abc…");
    }
}
