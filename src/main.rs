use anyhow::{bail, Context};
use serum_client::core::config::{ClientConfig, TransportKind};
use serum_client::core::types::GetOrderbookResponse;
use serum_client::serum::builder;
use serum_client::MarketDataSource;

/// Usage: serum-client [http|ws|grpc] [MARKET] [LIMIT]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let transport = args.next().unwrap_or_else(|| "http".to_string());
    let market = args.next().unwrap_or_else(|| "SOL/USDC".to_string());
    let limit: u32 = match args.next() {
        Some(raw) => raw.parse().with_context(|| format!("invalid limit `{}`", raw))?,
        None => 0,
    };

    let orderbook = match transport.as_str() {
        "http" => {
            let client = builder::new_http_client_with_opts(load_config(TransportKind::Http)?)?;
            client.get_orderbook(&market, limit).await?
        }
        "ws" => {
            let client =
                builder::new_ws_client_with_opts(load_config(TransportKind::WebSocket)?).await?;
            let orderbook = client.get_orderbook(&market, limit).await;
            client.transport().close().await?;
            orderbook?
        }
        "grpc" => {
            let client = builder::new_grpc_client_with_opts(load_config(TransportKind::Grpc)?)?;
            client.get_orderbook(&market, limit).await?
        }
        other => bail!("unknown transport `{}`, expected http, ws or grpc", other),
    };

    print_orderbook(&orderbook);
    Ok(())
}

#[cfg(feature = "env-file")]
fn load_config(kind: TransportKind) -> anyhow::Result<ClientConfig> {
    Ok(ClientConfig::from_env_file(kind)?)
}

#[cfg(not(feature = "env-file"))]
fn load_config(kind: TransportKind) -> anyhow::Result<ClientConfig> {
    Ok(ClientConfig::from_env(kind)?)
}

fn print_orderbook(orderbook: &GetOrderbookResponse) {
    println!(
        "{} ({}): {} bids, {} asks",
        orderbook.market,
        orderbook.market_address,
        orderbook.bids.len(),
        orderbook.asks.len()
    );
    for (bid, ask) in orderbook.bids.iter().zip(orderbook.asks.iter()).take(5) {
        println!(
            "  {:>12.4} x {:<10.4} | {:>12.4} x {:<10.4}",
            bid.price, bid.size, ask.price, ask.size
        );
    }
}
