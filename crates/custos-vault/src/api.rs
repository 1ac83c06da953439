//! REST API for the vault service
//!
//! Callers are identified by the `x-custos-caller` header, which an
//! upstream gateway is trusted to authenticate.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, State},
    http::{header, request::Parts, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use custos_common::{AccountId, TxId, VaultError};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

use crate::engine::MultisigVault;
use crate::metrics;

/// Header carrying the authenticated caller's account id
pub const CALLER_HEADER: &str = "x-custos-caller";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub vault: Arc<MultisigVault>,
    pub registry: prometheus::Registry,
}

/// Handler error, rendered as `{"error": kind, "message": text}`
#[derive(Debug)]
pub enum ApiError {
    Vault(VaultError),
    MissingCaller,
    InvalidCaller(String),
    NotFound(TxId),
    Internal(String),
}

impl From<VaultError> for ApiError {
    fn from(err: VaultError) -> Self {
        ApiError::Vault(err)
    }
}

/// HTTP status for a vault error
pub fn status_for(err: &VaultError) -> StatusCode {
    match err {
        VaultError::InvalidSigner(_) => StatusCode::FORBIDDEN,
        VaultError::UnknownOrCompletedTransaction(_) => StatusCode::NOT_FOUND,
        VaultError::DuplicateApproval { .. }
        | VaultError::ConflictingQuorumProposal { .. }
        | VaultError::QuorumNotReached { .. } => StatusCode::CONFLICT,
        VaultError::QuorumTooSmall { .. }
        | VaultError::InsufficientSigners { .. }
        | VaultError::NullSigner { .. }
        | VaultError::DuplicateSigner(_)
        | VaultError::QuorumExceedsSigners { .. }
        | VaultError::ZeroAmount
        | VaultError::NullAddress { .. }
        | VaultError::InsufficientFunds { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        VaultError::ExternalLedgerFailure(_) => StatusCode::BAD_GATEWAY,
        VaultError::Storage(_)
        | VaultError::Serialization(_)
        | VaultError::CorruptSnapshot(_)
        | VaultError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::Vault(err) => (status_for(&err), err.kind(), err.to_string()),
            ApiError::MissingCaller => (
                StatusCode::UNAUTHORIZED,
                "missing_caller",
                format!("{} header is required", CALLER_HEADER),
            ),
            ApiError::InvalidCaller(reason) => {
                (StatusCode::BAD_REQUEST, "invalid_caller", reason)
            }
            ApiError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                "not_found",
                format!("Transaction {} does not exist", id),
            ),
            ApiError::Internal(reason) => {
                error!(error = %reason, "Internal API error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", reason)
            }
        };

        (
            status,
            Json(serde_json::json!({ "error": kind, "message": message })),
        )
            .into_response()
    }
}

/// Caller identity extracted from [`CALLER_HEADER`]
#[derive(Debug, Clone, Copy)]
pub struct Caller(pub AccountId);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(CALLER_HEADER)
            .ok_or(ApiError::MissingCaller)?;
        let text = value
            .to_str()
            .map_err(|e| ApiError::InvalidCaller(e.to_string()))?;
        AccountId::parse(text.trim())
            .map(Caller)
            .map_err(|e| ApiError::InvalidCaller(e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct TransferBody {
    pub amount: u128,
    pub recipient: AccountId,
    pub asset_ledger: AccountId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransferCreated {
    pub tx_id: TxId,
}

#[derive(Debug, Deserialize)]
pub struct QuorumBody {
    pub proposed_quorum: u32,
    /// Defaults to the caller
    pub approver: Option<AccountId>,
}

/// Build the service router
pub fn router(vault: Arc<MultisigVault>, registry: prometheus::Registry) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::HeaderName::from_static(CALLER_HEADER),
        ]);

    Router::new()
        .route("/health", get(health))
        .route("/api/v1/version", get(version))
        .route("/metrics", get(render_metrics))
        .route("/api/v1/vault", get(vault_summary))
        .route("/api/v1/transactions", get(list_transactions).post(propose_transfer))
        .route("/api/v1/transactions/:id", get(get_transaction))
        .route("/api/v1/transactions/:id/approve", post(approve_transaction))
        .route("/api/v1/transactions/:id/execute", post(execute_transaction))
        .route("/api/v1/quorum", post(update_quorum))
        .layer(cors)
        .with_state(AppState { vault, registry })
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

async fn version() -> impl IntoResponse {
    Json(serde_json::json!({
        "service": "custos-vault",
        "version": crate::VERSION,
    }))
}

async fn render_metrics(State(state): State<AppState>) -> Result<Response, ApiError> {
    let body = metrics::render(&state.registry).map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok((
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; version=0.0.4"),
        )],
        body,
    )
        .into_response())
}

async fn vault_summary(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.vault.summary().await)
}

async fn list_transactions(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.vault.transactions().await)
}

async fn propose_transfer(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(body): Json<TransferBody>,
) -> Result<impl IntoResponse, ApiError> {
    let tx_id = state
        .vault
        .transfer(caller, body.amount, body.recipient, body.asset_ledger)
        .await?;
    Ok((StatusCode::CREATED, Json(TransferCreated { tx_id })))
}

async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let tx_id = TxId(id);
    state
        .vault
        .transaction(tx_id)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound(tx_id))
}

async fn approve_transaction(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state.vault.approve_tx(caller, TxId(id)).await?;
    Ok(Json(outcome))
}

async fn execute_transaction(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = state.vault.execute_tx(caller, TxId(id)).await?;
    Ok(Json(outcome))
}

async fn update_quorum(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(body): Json<QuorumBody>,
) -> Result<impl IntoResponse, ApiError> {
    let approver = body.approver.unwrap_or(caller);
    let outcome = state
        .vault
        .update_quorum(caller, body.proposed_quorum, approver)
        .await?;
    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use custos_common::LedgerError;

    #[test]
    fn test_status_mapping() {
        let a = AccountId::new([1; 20]);
        assert_eq!(status_for(&VaultError::InvalidSigner(a)), StatusCode::FORBIDDEN);
        assert_eq!(
            status_for(&VaultError::UnknownOrCompletedTransaction(TxId(4))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&VaultError::DuplicateApproval { approver: a }),
            StatusCode::CONFLICT
        );
        assert_eq!(status_for(&VaultError::ZeroAmount), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            status_for(&VaultError::ExternalLedgerFailure(LedgerError::Unavailable(
                "down".to_string()
            ))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&VaultError::Storage("disk".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
