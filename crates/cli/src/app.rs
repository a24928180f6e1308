use anyhow::{bail, Context};
use chrono::Utc;
use tracing::{info, warn};

use crypto_portfolio_core::models::holding::AssetHolding;
use crypto_portfolio_core::models::settings::Settings;
use crypto_portfolio_core::views::holdings_table::{
    build_holdings_table, holding_cards, HoldingsTableQuery,
};
use crypto_portfolio_core::views::market_table::{build_market_page, coin_options, MarketTableQuery};
use crypto_portfolio_core::views::SortOrder;
use crypto_portfolio_core::AssetStore;

use crate::args::{Cli, CoinArgs, Command, HoldingOp, MarketArgs, PortfolioArgs};
use crate::render;

pub(crate) struct Application {
    settings: Settings,
    json: bool,
    command: Command,
}

impl Application {
    pub(crate) fn init() -> anyhow::Result<(Application, String)> {
        let cli = Cli::parse_ordered();

        let mut settings = Settings::from_env().context("loading settings from environment")?;
        if let Some(url) = cli.base_url {
            settings.base_url = url.trim_end_matches('/').to_string();
            settings.validate()?;
        }

        let application = Application {
            settings,
            json: cli.json,
            command: cli.cmd,
        };
        Ok((application, cli.log_level))
    }

    pub(crate) async fn run(self) -> anyhow::Result<()> {
        let mut store = AssetStore::new(self.settings);
        match &self.command {
            Command::Market(args) => run_market(&mut store, args, self.json).await,
            Command::Portfolio(args) => run_portfolio(&mut store, args, self.json).await,
            Command::Coin(args) => run_coin(&mut store, args, self.json).await,
        }
    }
}

fn order(desc: bool) -> SortOrder {
    if desc {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    }
}

async fn run_market(store: &mut AssetStore, args: &MarketArgs, json: bool) -> anyhow::Result<()> {
    let listing = store.refresh_market().await;
    if listing.is_empty() {
        warn!("market listing is empty; the upstream API may be unavailable");
    }

    let query = MarketTableQuery {
        search: args.search.clone(),
        sort_field: args.sort,
        sort_order: order(args.desc),
        page: args.page,
        page_size: args.page_size,
    };
    let page = build_market_page(listing, &query);

    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print!("{}", render::market_page(&page));
    }
    Ok(())
}

/// Apply `--add`/`--remove` requests in the order they were given.
fn apply_ops(store: &mut AssetStore, ops: &[HoldingOp]) -> anyhow::Result<()> {
    for op in ops {
        match op {
            HoldingOp::Add(add) => {
                if store.find_coin(&add.coin).is_none() {
                    warn!(coin = %add.coin, "coin not in market snapshot; it will be valued at 0");
                }
                store
                    .add_holding(AssetHolding::new(add.coin.clone(), add.amount, add.price, Utc::now()))
                    .with_context(|| format!("adding {}", add.coin))?;
            }
            HoldingOp::Remove(coin) => {
                let removed = store.remove_holding(coin);
                info!(coin = %coin, removed, "removed holdings");
            }
        }
    }
    Ok(())
}

async fn run_coin(store: &mut AssetStore, args: &CoinArgs, json: bool) -> anyhow::Result<()> {
    if store.refresh_market().await.is_empty() {
        warn!("market listing is empty; the upstream API may be unavailable");
    }

    match &args.id {
        None => {
            let options = coin_options(store.market());
            if json {
                println!("{}", serde_json::to_string_pretty(&options)?);
            } else {
                print!("{}", render::coin_options(&options));
            }
        }
        Some(id) => {
            let id = id.trim().to_lowercase();
            let Some(coin) = store.find_coin(&id) else {
                bail!("coin {id:?} is not in the market snapshot");
            };
            if json {
                println!("{}", serde_json::to_string_pretty(coin)?);
            } else {
                print!("{}", render::coin_info(coin));
            }
        }
    }
    Ok(())
}

async fn run_portfolio(
    store: &mut AssetStore,
    args: &PortfolioArgs,
    json: bool,
) -> anyhow::Result<()> {
    store.initialize().await;

    apply_ops(store, &args.ops)?;

    let derived = store.derived_holdings();
    let query = HoldingsTableQuery {
        sort_field: args.sort,
        sort_order: order(args.desc),
        grow_filter: match (args.growing, args.falling) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        },
    };
    let table = build_holdings_table(&derived, &query);
    let cards = holding_cards(&derived);
    let summary = store.portfolio_summary();

    if json {
        let doc = serde_json::json!({
            "cards": cards,
            "table": table,
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        print!("{}", render::holding_cards(&cards));
        println!();
        print!("{}", render::holdings_table(&table));
        println!();
        print!("{}", render::summary(&summary));
    }
    Ok(())
}
