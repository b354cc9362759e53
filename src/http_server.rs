//! HTTP presentation layer. Translates requests into ledger calls and
//! ledger results into responses; holds no account state of its own.

use {
    crate::{
        config::HttpConfig,
        ledger::{error::LedgerError, interface::LedgerInterface},
        measure,
        metrics::{
            ACCOUNTS_CREATED_TOTAL, GET_ACCOUNT_TIME_SECONDS, OPEN_ACCOUNT_TIME_SECONDS,
            TOP_UP_TIME_SECONDS, TRANSACTIONS_FAILED_TOTAL, TRANSACTIONS_PROCESSED_TOTAL,
            TRANSFER_TIME_SECONDS, handler::render_metrics,
        },
        models::{AccountId, TopUpInstruction, TransactionReceipt, TransferInstruction},
    },
    axum::{
        Json, Router,
        extract::{Path, State},
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::{get, post},
    },
    std::{net::SocketAddr, str::FromStr, sync::Arc},
    tracing::{error, info},
};

pub type SharedLedger = Arc<dyn LedgerInterface + Send + Sync>;

/// Every ledger rejection maps to a client-error response carrying the
/// human-readable message as the body.
struct ApiError(LedgerError);

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        TRANSACTIONS_FAILED_TOTAL.inc();
        (StatusCode::BAD_REQUEST, self.0.to_string()).into_response()
    }
}

pub fn router(ledger: SharedLedger) -> Router {
    Router::new()
        .route("/accounts", post(open_account))
        .route("/accounts/{account_id}", get(account_info))
        .route("/accounts/{account_id}/topup", post(top_up))
        .route("/transfer", post(transfer))
        .route("/metrics", get(metrics))
        .with_state(ledger)
}

async fn open_account(State(ledger): State<SharedLedger>) -> Result<impl IntoResponse, ApiError> {
    let id = measure!(OPEN_ACCOUNT_TIME_SECONDS, { ledger.open_account() })?;

    ACCOUNTS_CREATED_TOTAL.inc();
    TRANSACTIONS_PROCESSED_TOTAL.inc();
    info!("Opened account {id}");

    Ok((StatusCode::CREATED, Json(id)))
}

async fn account_info(
    State(ledger): State<SharedLedger>,
    Path(account_id): Path<AccountId>,
) -> Result<impl IntoResponse, ApiError> {
    let account = measure!(GET_ACCOUNT_TIME_SECONDS, { ledger.account(account_id) })?;

    Ok(Json(account))
}

async fn top_up(
    State(ledger): State<SharedLedger>,
    Path(account_id): Path<AccountId>,
    Json(instruction): Json<TopUpInstruction>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction_id = measure!(TOP_UP_TIME_SECONDS, {
        ledger.credit(account_id, instruction.amount)
    })?;

    TRANSACTIONS_PROCESSED_TOTAL.inc();
    info!("Credited account {account_id} with {}", instruction.amount);

    Ok(Json(TransactionReceipt { transaction_id }))
}

async fn transfer(
    State(ledger): State<SharedLedger>,
    Json(instruction): Json<TransferInstruction>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction_id = measure!(TRANSFER_TIME_SECONDS, { ledger.transfer(&instruction) })?;

    TRANSACTIONS_PROCESSED_TOTAL.inc();
    info!(
        "Transferred {} from account {} to account {}",
        instruction.amount, instruction.source, instruction.destination
    );

    Ok(Json(TransactionReceipt { transaction_id }))
}

async fn metrics() -> Response {
    render_metrics().into_response()
}

pub async fn start_http_service(
    config: HttpConfig,
    ledger: SharedLedger,
    mut shutdown_receiver: tokio::sync::broadcast::Receiver<()>,
) {
    let address = format!("{}:{}", config.address, config.port);
    let socket_addr = match SocketAddr::from_str(&address) {
        Ok(addr) => addr,
        Err(e) => {
            error!("Invalid HTTP address: {}: {}", address, e);
            return;
        }
    };

    let listener = match tokio::net::TcpListener::bind(socket_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", address, e);
            return;
        }
    };

    let shutdown = async move {
        shutdown_receiver.recv().await.ok();
        info!("HTTP server is shutting down...");
    };

    info!("Initializing HTTP server at {}", address);

    if let Err(e) = axum::serve(listener, router(ledger))
        .with_graceful_shutdown(shutdown)
        .await
    {
        error!("Error in HTTP server: {}", e);
    }
}
