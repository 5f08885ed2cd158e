//! Ledger statistics.
//!
//! [`aggregate`] turns a set of [`LedgerRecord`]s into daily, monthly and
//! yearly buckets plus summary statistics. It is a pure function: the
//! reference day is passed in, so the same input always yields the same
//! [`LedgerStats`].
//!
//! Bucket scopes:
//!
//! - daily: every day of the month containing `today`, zero-filled;
//! - monthly: January to December of the year containing `today`, zero-filled;
//! - yearly: every year that has at least one record, never zero-filled.
//!
//! Totals, minimums and maximums cover every record regardless of date.
//! Averages divide the totals by the number of days in the daily bucket.

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};

use crate::{EngineError, LedgerRecord, MoneyCents, ResultEngine};

/// Summed revenue, expense and net of a bucket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub revenue: MoneyCents,
    pub expense: MoneyCents,
    pub net: MoneyCents,
}

impl Totals {
    /// Add `record` to the bucket, failing instead of wrapping on overflow.
    fn add(&mut self, record: &LedgerRecord) -> ResultEngine<()> {
        let overflow = || EngineError::InvalidData("ledger totals overflow".to_string());

        self.revenue = self.revenue.checked_add(record.revenue).ok_or_else(overflow)?;
        self.expense = self.expense.checked_add(record.expense).ok_or_else(overflow)?;
        self.net = self.net.checked_add(record.net).ok_or_else(overflow)?;
        Ok(())
    }
}

/// Totals of one calendar month of the current year.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthTotals {
    /// Month number, 1 to 12.
    pub month: u32,
    /// Display label, e.g. `"March 2025"`.
    pub label: String,
    pub totals: Totals,
}

/// Averages and extremes over the aggregated records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub avg_revenue: MoneyCents,
    pub avg_expense: MoneyCents,
    pub avg_net: MoneyCents,
    pub max_revenue: MoneyCents,
    pub min_revenue: MoneyCents,
    pub max_expense: MoneyCents,
    pub min_expense: MoneyCents,
    pub max_net: MoneyCents,
    pub min_net: MoneyCents,
}

/// Result of [`aggregate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerStats {
    /// Input records, ordered by date ascending.
    pub records: Vec<LedgerRecord>,
    pub daily: BTreeMap<NaiveDate, Totals>,
    /// Always twelve entries, January first.
    pub monthly: Vec<MonthTotals>,
    pub yearly: BTreeMap<i32, Totals>,
    pub summary: Summary,
}

/// Running maximum and minimum.
///
/// Starts empty rather than at a sentinel, so all-negative or very large
/// series are reported as they are. An empty series reports zero.
#[derive(Default)]
struct Extremes {
    max: Option<MoneyCents>,
    min: Option<MoneyCents>,
}

impl Extremes {
    fn observe(&mut self, value: MoneyCents) {
        self.max = Some(self.max.map_or(value, |max| max.max(value)));
        self.min = Some(self.min.map_or(value, |min| min.min(value)));
    }

    fn max(&self) -> MoneyCents {
        self.max.unwrap_or(MoneyCents::ZERO)
    }

    fn min(&self) -> MoneyCents {
        self.min.unwrap_or(MoneyCents::ZERO)
    }
}

/// First and last day of the month containing `today`.
pub fn month_bounds(today: NaiveDate) -> ResultEngine<(NaiveDate, NaiveDate)> {
    let out_of_range = || EngineError::InvalidData(format!("date out of range: {today}"));

    let start = today.with_day(1).ok_or_else(out_of_range)?;
    let end = start
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .ok_or_else(out_of_range)?;
    Ok((start, end))
}

/// Aggregate `records` relative to `today`.
///
/// Fails with [`EngineError::InvalidData`] if any record date cannot be
/// parsed; no partial result is produced.
pub fn aggregate(records: Vec<LedgerRecord>, today: NaiveDate) -> ResultEngine<LedgerStats> {
    let (month_start, month_end) = month_bounds(today)?;
    let current_year = today.year();

    let mut dated = records
        .into_iter()
        .map(|record| record.parsed_date().map(|date| (date, record)))
        .collect::<ResultEngine<Vec<_>>>()?;
    dated.sort_by(|(a_date, a), (b_date, b)| a_date.cmp(b_date).then(a.id.cmp(&b.id)));

    let mut daily: BTreeMap<NaiveDate, Totals> = BTreeMap::new();
    let mut months = [Totals::default(); 12];
    let mut yearly: BTreeMap<i32, Totals> = BTreeMap::new();

    let mut totals = Totals::default();
    let mut revenue = Extremes::default();
    let mut expense = Extremes::default();
    let mut net = Extremes::default();

    for (date, record) in &dated {
        if (month_start..=month_end).contains(date) {
            daily.entry(*date).or_default().add(record)?;
        }
        if date.year() == current_year {
            months[date.month0() as usize].add(record)?;
        }
        yearly.entry(date.year()).or_default().add(record)?;

        totals.add(record)?;
        revenue.observe(record.revenue);
        expense.observe(record.expense);
        net.observe(record.net);
    }

    for day in month_start.iter_days().take_while(|day| *day <= month_end) {
        daily.entry(day).or_default();
    }

    let monthly = months
        .into_iter()
        .zip(1u32..)
        .map(|(totals, month)| {
            let first = NaiveDate::from_ymd_opt(current_year, month, 1).ok_or_else(|| {
                EngineError::InvalidData(format!("invalid month {current_year}-{month}"))
            })?;
            Ok(MonthTotals {
                month,
                label: first.format("%B %Y").to_string(),
                totals,
            })
        })
        .collect::<ResultEngine<Vec<_>>>()?;

    let days = daily.len();
    let summary = Summary {
        avg_revenue: totals.revenue.div_rounded(days),
        avg_expense: totals.expense.div_rounded(days),
        avg_net: totals.net.div_rounded(days),
        max_revenue: revenue.max(),
        min_revenue: revenue.min(),
        max_expense: expense.max(),
        min_expense: expense.min(),
        max_net: net.max(),
        min_net: net.min(),
    };

    Ok(LedgerStats {
        records: dated.into_iter().map(|(_, record)| record).collect(),
        daily,
        monthly,
        yearly,
        summary,
    })
}
