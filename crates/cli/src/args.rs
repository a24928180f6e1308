use std::ffi::OsString;

use clap::{ArgMatches, Args, CommandFactory, FromArgMatches, Parser, Subcommand};

use crypto_portfolio_core::views::holdings_table::HoldingSortField;
use crypto_portfolio_core::views::market_table::{MarketSortField, DEFAULT_PAGE_SIZE};

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub(crate) struct Cli {
    /// Log filter (e.g. "info", "crypto_portfolio_core=debug"); RUST_LOG wins when set
    #[arg(long, default_value = "warn", global = true)]
    pub(crate) log_level: String,

    /// CoinGecko API root
    #[arg(long, env = "COINGECKO_BASE_URL", global = true)]
    pub(crate) base_url: Option<String>,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub(crate) json: bool,

    #[command(subcommand)]
    pub(crate) cmd: Command,
}

impl Cli {
    /// Parse `std::env::args_os`, exiting with clap's message on error.
    pub(crate) fn parse_ordered() -> Self {
        Self::try_parse_ordered_from(std::env::args_os()).unwrap_or_else(|e| e.exit())
    }

    /// Like `try_parse_from`, but also records the command-line order of
    /// `portfolio --add/--remove` in [`PortfolioArgs::ops`].
    pub(crate) fn try_parse_ordered_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Self::command().try_get_matches_from(args)?;
        let mut cli = Self::from_arg_matches(&matches)?;
        if let (Command::Portfolio(portfolio), Some(sub)) =
            (&mut cli.cmd, matches.subcommand_matches("portfolio"))
        {
            portfolio.ops = ordered_ops(portfolio, sub);
        }
        Ok(cli)
    }
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Show the market listing
    Market(MarketArgs),

    /// Show demo holdings, optionally adding or removing some first
    Portfolio(PortfolioArgs),

    /// Show one coin's details, or list the selectable coins
    Coin(CoinArgs),
}

#[derive(Args, Debug)]
pub(crate) struct CoinArgs {
    /// Coin id (e.g. "bitcoin"); omit to list every coin in the snapshot
    pub(crate) id: Option<String>,
}

#[derive(Args, Debug)]
pub(crate) struct MarketArgs {
    /// Filter by name or symbol (case-insensitive)
    #[arg(long, default_value = "")]
    pub(crate) search: String,

    /// rank, name, symbol, price, 1h, 24h, 7d, market-cap, volume, supply
    #[arg(long, default_value = "rank")]
    pub(crate) sort: MarketSortField,

    /// Sort descending
    #[arg(long)]
    pub(crate) desc: bool,

    #[arg(long, default_value_t = 1)]
    pub(crate) page: usize,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub(crate) page_size: usize,
}

#[derive(Args, Debug)]
pub(crate) struct PortfolioArgs {
    /// Add a holding as coin:amount:price (repeatable)
    #[arg(long = "add", value_name = "COIN:AMOUNT:PRICE", value_parser = parse_add)]
    pub(crate) add: Vec<AddHolding>,

    /// Remove every holding of a coin id (repeatable)
    #[arg(long = "remove", value_name = "COIN")]
    pub(crate) remove: Vec<String>,

    /// name, amount, price, current-price, value, profit, date
    #[arg(long)]
    pub(crate) sort: Option<HoldingSortField>,

    /// Sort descending
    #[arg(long)]
    pub(crate) desc: bool,

    /// Only positions priced above their purchase price
    #[arg(long, conflicts_with = "falling")]
    pub(crate) growing: bool,

    /// Only positions priced at or below their purchase price
    #[arg(long)]
    pub(crate) falling: bool,

    /// `--add`/`--remove` merged in command-line order
    #[arg(skip)]
    pub(crate) ops: Vec<HoldingOp>,
}

/// One holding mutation requested on the command line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum HoldingOp {
    Add(AddHolding),
    Remove(String),
}

fn ordered_ops(args: &PortfolioArgs, matches: &ArgMatches) -> Vec<HoldingOp> {
    let adds = matches
        .indices_of("add")
        .into_iter()
        .flatten()
        .zip(args.add.iter().cloned().map(HoldingOp::Add));
    let removes = matches
        .indices_of("remove")
        .into_iter()
        .flatten()
        .zip(args.remove.iter().cloned().map(HoldingOp::Remove));

    let mut ops: Vec<(usize, HoldingOp)> = adds.chain(removes).collect();
    ops.sort_by_key(|(idx, _)| *idx);
    ops.into_iter().map(|(_, op)| op).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AddHolding {
    pub(crate) coin: String,
    pub(crate) amount: f64,
    pub(crate) price: f64,
}

fn parse_add(s: &str) -> Result<AddHolding, String> {
    let parts: Vec<&str> = s.split(':').collect();
    let [coin, amount, price] = parts.as_slice() else {
        return Err(format!("expected COIN:AMOUNT:PRICE, got {s:?}"));
    };
    let amount: f64 = amount
        .parse()
        .map_err(|e| format!("invalid amount {amount:?}: {e}"))?;
    let price: f64 = price
        .parse()
        .map_err(|e| format!("invalid price {price:?}: {e}"))?;
    Ok(AddHolding {
        coin: coin.trim().to_lowercase(),
        amount,
        price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_add_accepts_three_fields() {
        let add = parse_add("Bitcoin:2:40000").unwrap();
        assert_eq!(
            add,
            AddHolding {
                coin: "bitcoin".into(),
                amount: 2.0,
                price: 40000.0
            }
        );
    }

    #[test]
    fn parse_add_rejects_missing_price() {
        assert!(parse_add("bitcoin:2").is_err());
    }

    #[test]
    fn parse_add_rejects_bad_number() {
        assert!(parse_add("bitcoin:two:40000").is_err());
    }

    #[test]
    fn cli_parses_portfolio_flags() {
        let cli = Cli::try_parse_from([
            "crypto-portfolio",
            "portfolio",
            "--add",
            "bitcoin:2:40000",
            "--remove",
            "ethereum",
            "--sort",
            "profit",
            "--desc",
        ])
        .unwrap();
        match cli.cmd {
            Command::Portfolio(args) => {
                assert_eq!(args.add.len(), 1);
                assert_eq!(args.remove, vec!["ethereum".to_string()]);
                assert_eq!(args.sort, Some(HoldingSortField::TotalProfit));
                assert!(args.desc);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn portfolio_ops_keep_command_line_order() {
        let cli = Cli::try_parse_ordered_from([
            "crypto-portfolio",
            "portfolio",
            "--remove",
            "bitcoin",
            "--add",
            "bitcoin:1:100",
            "--remove",
            "ethereum",
        ])
        .unwrap();
        let Command::Portfolio(args) = cli.cmd else {
            panic!("expected portfolio command");
        };
        assert_eq!(
            args.ops,
            vec![
                HoldingOp::Remove("bitcoin".into()),
                HoldingOp::Add(AddHolding {
                    coin: "bitcoin".into(),
                    amount: 1.0,
                    price: 100.0
                }),
                HoldingOp::Remove("ethereum".into()),
            ]
        );
    }

    #[test]
    fn plain_parse_leaves_ops_empty() {
        let cli = Cli::try_parse_from(["crypto-portfolio", "portfolio", "--remove", "bitcoin"]).unwrap();
        let Command::Portfolio(args) = cli.cmd else {
            panic!("expected portfolio command");
        };
        assert!(args.ops.is_empty());
        assert_eq!(args.remove, vec!["bitcoin".to_string()]);
    }

    #[test]
    fn coin_id_is_optional() {
        let cli = Cli::try_parse_ordered_from(["crypto-portfolio", "coin", "bitcoin"]).unwrap();
        assert!(matches!(cli.cmd, Command::Coin(CoinArgs { id: Some(ref id) }) if id == "bitcoin"));

        let cli = Cli::try_parse_ordered_from(["crypto-portfolio", "coin"]).unwrap();
        assert!(matches!(cli.cmd, Command::Coin(CoinArgs { id: None })));
    }

    #[test]
    fn cli_rejects_growing_with_falling() {
        let res = Cli::try_parse_from(["crypto-portfolio", "portfolio", "--growing", "--falling"]);
        assert!(res.is_err());
    }
}
