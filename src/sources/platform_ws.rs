//! Platform WebSocket tick source.
//!
//! Connects to the trading platform's quote feed, decodes quote frames, and
//! forwards price ticks to the engine channel. The connection is supervised:
//! any disconnect or read error tears the stream down and reconnects after a
//! fixed delay, with the engine state untouched.

use crate::services::EngineEvent;
use crate::types::PriceTick;
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, error, info, warn};

const RECONNECT_DELAY_SECS: u64 = 5;

/// Quote subscription request.
#[derive(Debug, Serialize)]
struct SubscribeMessage {
    #[serde(rename = "t")]
    msg_type: u32,
    #[serde(rename = "d")]
    assets: Vec<AssetRef>,
}

#[derive(Debug, Serialize)]
struct AssetRef {
    #[serde(rename = "p")]
    ticker: String,
}

/// One quote frame: a batch of price points.
#[derive(Debug, Deserialize)]
struct QuoteFrame {
    #[serde(rename = "d")]
    points: Vec<QuotePoint>,
}

#[derive(Debug, Deserialize)]
struct QuotePoint {
    #[serde(rename = "p")]
    ticker: String,
    #[serde(rename = "q")]
    price: f64,
    /// Epoch seconds.
    #[serde(rename = "t")]
    timestamp: i64,
}

/// Platform quote-feed WebSocket client.
#[derive(Clone)]
pub struct PlatformWs {
    url: String,
    ticker: String,
    events_tx: mpsc::Sender<EngineEvent>,
}

impl PlatformWs {
    pub fn new(url: String, ticker: String, events_tx: mpsc::Sender<EngineEvent>) -> Self {
        Self {
            url,
            ticker,
            events_tx,
        }
    }

    /// Connect and forward ticks until the engine channel closes.
    pub async fn connect(&self) -> anyhow::Result<()> {
        loop {
            match self.run_connection().await {
                Ok(_) => {
                    warn!("Quote feed disconnected, reconnecting...");
                }
                Err(e) => {
                    error!("Quote feed error: {}, reconnecting...", e);
                }
            }
            if self.events_tx.is_closed() {
                info!("Engine channel closed, stopping quote feed");
                return Ok(());
            }
            tokio::time::sleep(tokio::time::Duration::from_secs(RECONNECT_DELAY_SECS)).await;
        }
    }

    async fn run_connection(&self) -> anyhow::Result<()> {
        info!("Connecting to quote feed at {}", self.url);
        let (ws_stream, _) = connect_async(self.url.as_str()).await?;
        let (mut write, mut read) = ws_stream.split();
        info!("Connected to quote feed");

        let subscribe_msg = SubscribeMessage {
            msg_type: 2,
            assets: vec![AssetRef {
                ticker: self.ticker.clone(),
            }],
        };
        let msg_json = serde_json::to_string(&subscribe_msg)?;
        write.send(Message::Text(msg_json)).await?;

        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    self.handle_message(&text).await;
                }
                Ok(Message::Ping(data)) => {
                    let _ = write.send(Message::Pong(data)).await;
                }
                Ok(Message::Close(_)) => {
                    info!("Quote feed closed");
                    break;
                }
                Err(e) => {
                    error!("Quote feed read error: {}", e);
                    break;
                }
                _ => {}
            }
        }

        Ok(())
    }

    async fn handle_message(&self, text: &str) {
        for tick in parse_quote_frame(text) {
            debug!("Quote update: {} = {}", tick.ticker, tick.price);
            if self.events_tx.send(EngineEvent::Tick(tick)).await.is_err() {
                return;
            }
        }
    }
}

/// Decode a quote frame into ticks, dropping anything that does not match the
/// expected shape. The feed multiplexes other message kinds on the same
/// socket; those simply fail to decode and are ignored.
fn parse_quote_frame(text: &str) -> Vec<PriceTick> {
    let frame: QuoteFrame = match serde_json::from_str(text) {
        Ok(f) => f,
        Err(_) => return Vec::new(),
    };

    frame
        .points
        .into_iter()
        .map(|point| PriceTick {
            ticker: point.ticker,
            price: point.price,
            // The feed stamps quotes in epoch seconds.
            timestamp: point.timestamp * 1000,
        })
        .collect()
}
