//! Ledger CRUD endpoints

use api_types::{
    Message,
    ledger::{LedgerNew, LedgerRecord, LedgerUpdate, OwnerQuery},
};
use axum::{
    Json,
    extract::{Path, Query, State},
};
use axum_extra::extract::WithRejection;
use engine::{LedgerInput, MoneyCents};

use crate::{ServerError, server::ServerState};

pub(crate) fn record_view(record: engine::LedgerRecord) -> LedgerRecord {
    LedgerRecord {
        id: record.id,
        owner_id: record.owner_id,
        date: record.date,
        revenue: record.revenue.to_decimal(),
        expense: record.expense.to_decimal(),
        net: record.net.to_decimal(),
    }
}

fn ledger_input(date: String, revenue: f64, expense: f64) -> Result<LedgerInput, ServerError> {
    Ok(LedgerInput {
        date,
        revenue: MoneyCents::from_decimal(revenue)?,
        expense: MoneyCents::from_decimal(expense)?,
    })
}

pub(crate) fn require_owner(owner_id: Option<i32>) -> Result<i32, ServerError> {
    owner_id.ok_or_else(|| ServerError::Generic("owner_id is required".to_string()))
}

pub async fn list(
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<OwnerQuery>, ServerError>,
) -> Result<Json<Vec<LedgerRecord>>, ServerError> {
    let owner_id = require_owner(query.owner_id)?;
    let records = state.engine.ledger_records(owner_id).await?;

    Ok(Json(records.into_iter().map(record_view).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<Json<LedgerRecord>, ServerError> {
    let record = state.engine.ledger_record(id).await?;
    Ok(Json(record_view(record)))
}

pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<LedgerNew>, ServerError>,
) -> Result<Json<LedgerRecord>, ServerError> {
    let owner_id = require_owner(payload.owner_id)?;
    let input = ledger_input(payload.date, payload.revenue, payload.expense)?;
    let record = state.engine.create_ledger_record(owner_id, input).await?;

    Ok(Json(record_view(record)))
}

pub async fn update(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
    WithRejection(Json(payload), _): WithRejection<Json<LedgerUpdate>, ServerError>,
) -> Result<Json<LedgerRecord>, ServerError> {
    let input = ledger_input(payload.date, payload.revenue, payload.expense)?;
    let record = state.engine.update_ledger_record(id, input).await?;

    Ok(Json(record_view(record)))
}

pub async fn delete(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<Json<Message>, ServerError> {
    state.engine.delete_ledger_record(id).await?;
    Ok(Json(Message::new("deleted")))
}
