//! Statistics API endpoints

use api_types::ledger::{MonthTotals, OwnerQuery, Stats, Summary, Totals};
use axum::{
    Json,
    extract::{Query, State},
};
use axum_extra::extract::WithRejection;
use chrono::Local;
use engine::{DATE_FORMAT, LedgerStats};

use crate::{
    ServerError,
    ledger::{record_view, require_owner},
    server::ServerState,
};

fn totals_view(totals: engine::Totals) -> Totals {
    Totals {
        revenue: totals.revenue.to_decimal(),
        expense: totals.expense.to_decimal(),
        net: totals.net.to_decimal(),
    }
}

fn stats_view(stats: LedgerStats) -> Stats {
    let summary = stats.summary;

    Stats {
        records: stats.records.into_iter().map(record_view).collect(),
        daily: stats
            .daily
            .into_iter()
            .map(|(day, totals)| (day.format(DATE_FORMAT).to_string(), totals_view(totals)))
            .collect(),
        monthly: stats
            .monthly
            .into_iter()
            .map(|month| MonthTotals {
                month: month.label,
                revenue: month.totals.revenue.to_decimal(),
                expense: month.totals.expense.to_decimal(),
                net: month.totals.net.to_decimal(),
            })
            .collect(),
        yearly: stats
            .yearly
            .into_iter()
            .map(|(year, totals)| (format!("{year:04}"), totals_view(totals)))
            .collect(),
        summary: Summary {
            avg_revenue: summary.avg_revenue.to_decimal(),
            avg_expense: summary.avg_expense.to_decimal(),
            avg_net: summary.avg_net.to_decimal(),
            max_revenue: summary.max_revenue.to_decimal(),
            min_revenue: summary.min_revenue.to_decimal(),
            max_expense: summary.max_expense.to_decimal(),
            min_expense: summary.min_expense.to_decimal(),
            max_net: summary.max_net.to_decimal(),
            min_net: summary.min_net.to_decimal(),
        },
    }
}

async fn stats_for(state: &ServerState, owner_id: Option<i32>) -> Result<Json<Stats>, ServerError> {
    let owner_id = require_owner(owner_id)?;
    let today = Local::now().date_naive();
    let stats = state.engine.ledger_stats(owner_id, today).await?;

    Ok(Json(stats_view(stats)))
}

/// Handle `GET /ledger/stats?owner_id=`
pub async fn get_stats(
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<OwnerQuery>, ServerError>,
) -> Result<Json<Stats>, ServerError> {
    stats_for(&state, query.owner_id).await
}

/// Handle `POST /ledger/stats` with `{"owner_id": ...}`
pub async fn post_stats(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<OwnerQuery>, ServerError>,
) -> Result<Json<Stats>, ServerError> {
    stats_for(&state, payload.owner_id).await
}
