//! Order execution for Polymarket CLOB.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use alloy_signer_local::PrivateKeySigner;
use async_trait::async_trait;
use parking_lot::Mutex;
use polymarket_client_sdk::auth::state::Authenticated;
use polymarket_client_sdk::auth::{Normal, Signer};
use polymarket_client_sdk::clob::types::response::PostOrderResponse;
use polymarket_client_sdk::clob::types::Side;
use polymarket_client_sdk::clob::{Client, Config as ClobConfig};
use polymarket_client_sdk::types::U256;
use rust_decimal::Decimal;
use tokio::time::timeout;
use tracing::{info, warn};

use super::settings::PolymarketRuntimeConfig;
use crate::domain::execution_plan::{plan_legs, LegKind};
use crate::domain::idempotency::order_idempotency_key;
use crate::domain::{
    id::OrderId, opportunity::Opportunity, trade::Failure, trade::Fill, trade::TradeResult,
};
use crate::error::{ConfigError, ExecutionError, Result};
use crate::port::{
    outbound::exchange::ArbitrageExecutor, outbound::exchange::ExecutionResult,
    outbound::exchange::OrderExecutor, outbound::exchange::OrderRequest,
    outbound::exchange::OrderSide,
};

/// Type alias for the authenticated CLOB client.
type AuthenticatedClient = Client<Authenticated<Normal>>;

/// Overall wait for both legs' acks before the attempt is abandoned and any
/// already-acked leg is cancelled.
const ACK_TIMEOUT: Duration = Duration::from_secs(2);

/// Executes trades on Polymarket CLOB.
pub struct PolymarketExecutor {
    /// The authenticated CLOB client.
    client: Arc<AuthenticatedClient>,
    /// The signer for signing orders.
    signer: Arc<PrivateKeySigner>,
    /// Idempotency key -> order id already acked for it, so a retried attempt
    /// never resubmits a leg that already has a resting or filled order.
    idempotency_cache: Mutex<HashMap<String, String>>,
}

impl PolymarketExecutor {
    /// Create new executor by authenticating with Polymarket CLOB.
    pub async fn new(config: &PolymarketRuntimeConfig) -> Result<Self> {
        if config.private_key.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "WALLET_PRIVATE_KEY",
            }
            .into());
        }

        let chain_id = config.chain_id;

        // Create signer from private key
        let signer = PrivateKeySigner::from_str(&config.private_key)
            .map_err(|e| ConfigError::InvalidValue {
                field: "WALLET_PRIVATE_KEY",
                reason: e.to_string(),
            })?
            .with_chain_id(Some(chain_id));

        info!(
            chain_id = chain_id,
            address = %signer.address(),
            "Creating CLOB client"
        );

        // Create and authenticate client
        let client = Client::new(&config.api_url, ClobConfig::default())
            .map_err(|e| ExecutionError::AuthFailed(format!("Failed to create CLOB client: {e}")))?
            .authentication_builder(&signer)
            .authenticate()
            .await
            .map_err(|e| ExecutionError::AuthFailed(e.to_string()))?;

        info!("CLOB client authenticated successfully");

        Ok(Self {
            client: Arc::new(client),
            signer: Arc::new(signer),
            idempotency_cache: Mutex::new(HashMap::new()),
        })
    }

    /// Execute an arbitrage opportunity by placing orders on all legs in parallel.
    ///
    /// `attempt_id` keys the idempotency cache: a leg already acked under this
    /// attempt is never resubmitted, it is simply reported again from the
    /// cached order id.
    async fn execute_arbitrage_impl(
        &self,
        opportunity: &Opportunity,
        attempt_id: i32,
    ) -> Result<TradeResult> {
        info!(
            market = %opportunity.market_id(),
            edge = %opportunity.edge(),
            volume = %opportunity.volume(),
            legs = opportunity.legs().len(),
            attempt_id,
            "Executing arbitrage opportunity"
        );

        let legs = opportunity.legs();
        if legs.len() < 2 {
            return Ok(TradeResult::Failed {
                reason: "Opportunity must have at least 2 legs".to_string(),
            });
        }

        let volume = opportunity.volume();
        let now_unix = chrono::Utc::now().timestamp();
        let plan = plan_legs(opportunity, now_unix);

        // Legs already acked for this attempt are served from the idempotency
        // cache instead of being resubmitted; only the rest go out over the
        // wire.
        let mut fills = Vec::new();
        let mut to_submit = Vec::new();
        for leg_plan in plan {
            let key = order_idempotency_key(opportunity.market_id(), &leg_plan.token_id, attempt_id);
            let cached = self.idempotency_cache.lock().get(&key).cloned();
            if let Some(order_id) = cached {
                info!(token_id = %leg_plan.token_id, key, "Reusing acked order for retried leg");
                fills.push(Fill {
                    token_id: leg_plan.token_id.clone(),
                    order_id,
                });
            } else {
                to_submit.push((key, leg_plan));
            }
        }

        if to_submit.is_empty() {
            info!(fills = fills.len(), "All legs already acked for this attempt");
            return Ok(TradeResult::Success { fills });
        }

        // Submit the remaining legs in parallel, each at the maker/taker price
        // the leg plan selected for the current time-to-resolution. Each leg
        // runs on its own task so a leg that already acked keeps its order_id
        // even if the overall ack wait below times out.
        let mut token_ids = Vec::new();
        let mut keys = Vec::new();
        let handles: Vec<_> = to_submit
            .into_iter()
            .map(|(key, leg_plan)| {
                let token_id = leg_plan.token_id.clone();
                token_ids.push(token_id.clone());
                keys.push(key);
                let token_str = token_id.to_string();
                let price = leg_plan.price;
                let style = match leg_plan.kind {
                    LegKind::Maker => "maker",
                    LegKind::Taker => "taker",
                };
                let client = Arc::clone(&self.client);
                let signer = Arc::clone(&self.signer);
                tokio::spawn(async move {
                    info!(token_id = %token_str, style, price = %price, "Submitting leg");
                    Self::submit_order_on(&client, &signer, &token_str, Side::Buy, volume, price).await
                })
            })
            .collect();

        let joined = match timeout(ACK_TIMEOUT, futures_util::future::join_all(handles)).await {
            Ok(joined) => joined,
            Err(_) => {
                warn!(
                    market = %opportunity.market_id(),
                    timeout_ms = ACK_TIMEOUT.as_millis(),
                    "Ack wait exceeded overall timeout, aborting execution"
                );
                return Ok(TradeResult::Failed {
                    reason: format!("ack wait exceeded {}ms", ACK_TIMEOUT.as_millis()),
                });
            }
        };

        // Separate successful and failed legs
        let mut failures = Vec::new();

        for ((token_id, key), joined_result) in token_ids.into_iter().zip(keys).zip(joined) {
            match joined_result {
                Ok(Ok(resp)) => {
                    self.idempotency_cache
                        .lock()
                        .insert(key, resp.order_id.clone());
                    fills.push(Fill {
                        token_id,
                        order_id: resp.order_id,
                    });
                }
                Ok(Err(err)) => {
                    failures.push(Failure {
                        token_id,
                        error: err.to_string(),
                    });
                }
                Err(join_err) => {
                    failures.push(Failure {
                        token_id,
                        error: format!("submission task panicked: {join_err}"),
                    });
                }
            }
        }

        if failures.is_empty() {
            info!(fills = fills.len(), "All legs executed successfully");
            Ok(TradeResult::Success { fills })
        } else if fills.is_empty() {
            let errors: Vec<_> = failures.iter().map(|f| f.error.as_str()).collect();
            warn!(errors = ?errors, "All legs failed");
            Ok(TradeResult::Failed {
                reason: errors.join("; "),
            })
        } else {
            // At least one leg acked while another failed: cancel the acked
            // leg(s) so the attempt doesn't leave a resting one-sided order.
            // If a leg already filled before the cancel lands, the venue
            // rejects the cancel and the partial-fill hedge path takes over.
            warn!(
                fills = fills.len(),
                failures = failures.len(),
                "Partial ack: cancelling acked legs before reporting partial fill"
            );
            for fill in &fills {
                let order_id = OrderId::new(fill.order_id.clone());
                if let Err(err) = self.cancel_order_impl(&order_id).await {
                    warn!(order_id = %order_id, error = %err, "Failed to cancel acked leg after partial ack");
                } else {
                    let key =
                        order_idempotency_key(opportunity.market_id(), &fill.token_id, attempt_id);
                    self.idempotency_cache.lock().remove(&key);
                }
            }
            Ok(TradeResult::Partial { fills, failures })
        }
    }

    /// Submit a single order to the CLOB using the given client and signer.
    async fn submit_order_on(
        client: &AuthenticatedClient,
        signer: &PrivateKeySigner,
        token_id: &str,
        side: Side,
        size: Decimal,
        price: Decimal,
    ) -> Result<PostOrderResponse> {
        // Parse token ID to U256
        let token_id_u256 =
            U256::from_str(token_id).map_err(|e| ExecutionError::InvalidTokenId {
                token_id: token_id.to_string(),
                reason: e.to_string(),
            })?;

        // Build limit order
        let order = client
            .limit_order()
            .token_id(token_id_u256)
            .side(side)
            .price(price)
            .size(size)
            .build()
            .await
            .map_err(|e| ExecutionError::OrderBuildFailed(e.to_string()))?;

        // Sign order
        let signed_order = client
            .sign(signer, order)
            .await
            .map_err(|e| ExecutionError::SigningFailed(e.to_string()))?;

        // Submit order
        let response = client
            .post_order(signed_order)
            .await
            .map_err(|e| ExecutionError::SubmissionFailed(e.to_string()))?;

        info!(
            order_id = %response.order_id,
            token_id = token_id,
            side = ?side,
            size = %size,
            price = %price,
            "Order submitted"
        );

        Ok(response)
    }

    /// Submit a single order to the CLOB.
    async fn submit_order(
        &self,
        token_id: &str,
        side: Side,
        size: Decimal,
        price: Decimal,
    ) -> Result<PostOrderResponse> {
        Self::submit_order_on(&self.client, &self.signer, token_id, side, size, price).await
    }

    /// Cancel an order by ID.
    async fn cancel_order_impl(&self, order_id: &OrderId) -> Result<()> {
        let response = self
            .client
            .cancel_order(order_id.as_str())
            .await
            .map_err(|e| ExecutionError::SubmissionFailed(format!("Cancel failed: {e}")))?;

        if let Some(reason) = response.not_canceled.get(order_id.as_str()) {
            return Err(ExecutionError::OrderRejected(format!(
                "Order {} not cancelled: {}",
                order_id.as_str(),
                reason
            ))
            .into());
        }

        info!(order_id = %order_id, "Order cancelled");
        Ok(())
    }
}

#[async_trait]
impl OrderExecutor for PolymarketExecutor {
    async fn execute(&self, order: &OrderRequest) -> Result<ExecutionResult> {
        let side = match order.side {
            OrderSide::Buy => Side::Buy,
            OrderSide::Sell => Side::Sell,
        };

        if let Some(key) = &order.client_id {
            if let Some(order_id) = self.idempotency_cache.lock().get(key).cloned() {
                info!(order_id = %order_id, key, "Reusing acked order for retried request");
                return Ok(ExecutionResult::Success {
                    order_id: OrderId::new(order_id),
                    filled_amount: order.size,
                    average_price: order.price,
                });
            }
        }

        match self
            .submit_order(&order.token_id, side, order.size, order.price)
            .await
        {
            Ok(response) => {
                if let Some(key) = &order.client_id {
                    self.idempotency_cache
                        .lock()
                        .insert(key.clone(), response.order_id.clone());
                }
                Ok(ExecutionResult::Success {
                    order_id: OrderId::new(response.order_id),
                    filled_amount: order.size,
                    average_price: order.price,
                })
            }
            Err(e) => Ok(ExecutionResult::Failed {
                reason: e.to_string(),
            }),
        }
    }

    async fn cancel(&self, order_id: &OrderId) -> Result<()> {
        self.cancel_order_impl(order_id).await
    }

    fn exchange_name(&self) -> &'static str {
        "Polymarket"
    }
}

#[async_trait]
impl ArbitrageExecutor for PolymarketExecutor {
    async fn execute_arbitrage(
        &self,
        opportunity: &Opportunity,
        attempt_id: i32,
    ) -> Result<TradeResult> {
        self.execute_arbitrage_impl(opportunity, attempt_id).await
    }

    async fn cancel(&self, order_id: &OrderId) -> Result<()> {
        self.cancel_order_impl(order_id).await
    }

    fn exchange_name(&self) -> &'static str {
        "Polymarket"
    }
}
