//! # Sales Statistics
//!
//! Aggregates historical orders into daily buckets, item rankings and
//! period summaries. Everything here is recomputed on demand from a snapshot
//! of orders; nothing is persisted.
//!
//! ## Aggregation Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   &[Order] ──► status == Paid ──► local date ∈ DateRange                │
//! │                                         │                               │
//! │            ┌────────────────────────────┼──────────────────────┐        │
//! │            ▼                            ▼                      ▼        │
//! │     daily_sales()              top_selling_items()      status_counts() │
//! │     BTreeMap<"YYYY-MM-DD">     first-seen Vec +         (all statuses)  │
//! │     → Vec<SalesBucket>         stable sort desc                         │
//! │            │                            │                               │
//! │            └──────────► summarize() ◄───┘                               │
//! │                         SalesStatistics                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Local Days
//! Orders carry UTC timestamps. A shop day is the calendar date at the
//! aggregator's fixed UTC offset, so an order rung up at 7pm in Manila
//! (UTC+8) lands on the right day even though it is 11am UTC.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::order::Order;
use crate::types::OrderStatus;

/// Date key format for buckets and range bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Default number of entries in a top-items ranking.
pub const DEFAULT_TOP_ITEMS_LIMIT: usize = 5;

// =============================================================================
// Date Range
// =============================================================================

/// Inclusive range of shop days. `None` on either side means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a bounded range.
    ///
    /// ## Errors
    /// `InvalidDateRange` if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> CoreResult<Self> {
        if start > end {
            return Err(CoreError::InvalidDateRange(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        Ok(DateRange {
            start: Some(start),
            end: Some(end),
        })
    }

    /// Every day, past and future.
    pub const fn all() -> Self {
        DateRange {
            start: None,
            end: None,
        }
    }

    /// A single shop day.
    pub const fn day(date: NaiveDate) -> Self {
        DateRange {
            start: Some(date),
            end: Some(date),
        }
    }

    /// Parses optional `YYYY-MM-DD` bounds, failing on malformed input.
    ///
    /// Missing or blank bounds are open.
    ///
    /// ```rust
    /// use noodle_core::statistics::DateRange;
    ///
    /// let range = DateRange::parse(Some("2026-03-01"), Some("2026-03-31")).unwrap();
    /// assert_eq!(range.label(), "2026-03-01 to 2026-03-31");
    /// assert!(DateRange::parse(Some("March 1st"), None).is_err());
    /// ```
    pub fn parse(start: Option<&str>, end: Option<&str>) -> CoreResult<Self> {
        let start = parse_bound(start, "start")?;
        let end = parse_bound(end, "end")?;

        if let (Some(s), Some(e)) = (start, end) {
            return DateRange::new(s, e);
        }
        Ok(DateRange { start, end })
    }

    /// Parses optional bounds, treating malformed input as an open bound.
    ///
    /// Each fallback is logged at `warn`. A start after the end is kept as
    /// given and simply matches nothing.
    ///
    /// ```rust
    /// use noodle_core::statistics::DateRange;
    ///
    /// let range = DateRange::parse_lenient(Some("garbage"), Some("2026-03-31"));
    /// assert!(range.start.is_none());
    /// assert!(range.end.is_some());
    /// ```
    pub fn parse_lenient(start: Option<&str>, end: Option<&str>) -> Self {
        let lenient = |raw: Option<&str>, which: &str| match parse_bound(raw, which) {
            Ok(date) => date,
            Err(err) => {
                warn!(bound = which, input = raw.unwrap_or_default(), error = %err, "Ignoring malformed date bound");
                None
            }
        };

        DateRange {
            start: lenient(start, "start"),
            end: lenient(end, "end"),
        }
    }

    /// True if `date` falls inside the range (inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }

    /// Display label: `"{start} to {end}"`.
    pub fn label(&self) -> String {
        let start = self
            .start
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| "beginning".to_string());
        let end = self
            .end
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| "latest".to_string());
        format!("{} to {}", start, end)
    }
}

fn parse_bound(raw: Option<&str>, which: &str) -> CoreResult<Option<NaiveDate>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Some)
            .map_err(|_| {
                CoreError::InvalidDateRange(format!("{} date '{}' is not YYYY-MM-DD", which, s))
            }),
    }
}

// =============================================================================
// Period
// =============================================================================

/// Named reporting windows relative to "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Today,
    /// Monday through today.
    ThisWeek,
    /// First of the month through today.
    ThisMonth,
    Custom(DateRange),
}

impl Period {
    /// Resolves the period to concrete days.
    pub fn range(&self, today: NaiveDate) -> DateRange {
        match self {
            Period::Today => DateRange::day(today),
            Period::ThisWeek => {
                let offset = today.weekday().num_days_from_monday() as i64;
                DateRange {
                    start: Some(today - Duration::days(offset)),
                    end: Some(today),
                }
            }
            Period::ThisMonth => DateRange {
                start: Some(today.with_day(1).unwrap_or(today)),
                end: Some(today),
            },
            Period::Custom(range) => *range,
        }
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" | "day" => Ok(Period::Today),
            "week" | "this-week" | "this_week" => Ok(Period::ThisWeek),
            "month" | "this-month" | "this_month" => Ok(Period::ThisMonth),
            "all" => Ok(Period::Custom(DateRange::all())),
            other => Err(CoreError::InvalidDateRange(format!(
                "unknown period '{}' (expected today, week, month or all)",
                other
            ))),
        }
    }
}

// =============================================================================
// Item Grouping
// =============================================================================

/// How the top-items ranking identifies "the same item".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemGrouping {
    /// Lines with the same display name are merged, even across menu ids.
    #[default]
    Name,
    /// Lines are keyed by menu item id; the first-seen name is reported.
    MenuItemId,
}

impl fmt::Display for ItemGrouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemGrouping::Name => write!(f, "name"),
            ItemGrouping::MenuItemId => write!(f, "menu_item_id"),
        }
    }
}

impl FromStr for ItemGrouping {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(ItemGrouping::Name),
            "menu_item_id" | "id" => Ok(ItemGrouping::MenuItemId),
            other => Err(crate::error::ValidationError::InvalidFormat {
                field: "group_items_by".to_string(),
                reason: format!("'{}' is not one of name, menu_item_id", other),
            }
            .into()),
        }
    }
}

// =============================================================================
// Result Types
// =============================================================================

/// Aggregated paid sales for one shop day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesBucket {
    /// `YYYY-MM-DD`
    pub date: String,
    pub total_sales: Money,
    pub order_count: u32,
    pub items_sold: i64,
    /// `total_sales / order_count`, zero for an empty bucket.
    pub average_order_value: Money,
}

/// One row of the top-items ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemSales {
    pub name: String,
    /// Menu item id of the first line seen for this entry.
    pub menu_item_id: String,
    pub quantity: i64,
    pub revenue: Money,
}

/// Order counts by status within a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatusCounts {
    pub pending: u32,
    pub paid: u32,
    pub cancelled: u32,
    pub refunded: u32,
}

impl StatusCounts {
    pub fn total(&self) -> u32 {
        self.pending + self.paid + self.cancelled + self.refunded
    }
}

/// Everything the reports screen shows for one range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesStatistics {
    pub period_label: String,
    pub total_revenue: Money,
    pub total_orders: u32,
    pub total_items: i64,
    pub average_order_value: Money,
    pub daily: Vec<SalesBucket>,
    pub top_items: Vec<ItemSales>,
}

// =============================================================================
// Aggregator
// =============================================================================

/// Computes sales statistics over order snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatisticsAggregator {
    offset: FixedOffset,
    top_limit: usize,
    grouping: ItemGrouping,
}

impl Default for StatisticsAggregator {
    fn default() -> Self {
        StatisticsAggregator {
            offset: utc(),
            top_limit: DEFAULT_TOP_ITEMS_LIMIT,
            grouping: ItemGrouping::Name,
        }
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

impl StatisticsAggregator {
    /// Creates an aggregator for a shop at the given UTC offset in minutes.
    ///
    /// Offsets outside ±24h fall back to UTC.
    pub fn new(utc_offset_minutes: i32) -> Self {
        let offset = utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| {
                warn!(utc_offset_minutes, "UTC offset out of range, using UTC");
                utc()
            });
        StatisticsAggregator {
            offset,
            ..Default::default()
        }
    }

    pub fn with_top_limit(mut self, limit: usize) -> Self {
        self.top_limit = limit;
        self
    }

    pub fn with_grouping(mut self, grouping: ItemGrouping) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn top_limit(&self) -> usize {
        self.top_limit
    }

    pub fn grouping(&self) -> ItemGrouping {
        self.grouping
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Shop-local calendar day of a timestamp.
    pub fn local_date(&self, timestamp: DateTime<Utc>) -> NaiveDate {
        timestamp.with_timezone(&self.offset).date_naive()
    }

    /// Resolves a period against the current time.
    pub fn resolve(&self, period: Period, now: DateTime<Utc>) -> DateRange {
        period.range(self.local_date(now))
    }

    fn paid_in_range<'a>(
        &'a self,
        orders: &'a [Order],
        range: &'a DateRange,
    ) -> impl Iterator<Item = &'a Order> + 'a {
        orders.iter().filter(move |o| {
            o.status() == OrderStatus::Paid && range.contains(self.local_date(o.created_at()))
        })
    }

    /// Paid sales grouped by shop day, ascending by date.
    pub fn daily_sales(&self, orders: &[Order], range: &DateRange) -> Vec<SalesBucket> {
        let mut days: BTreeMap<String, (Money, u32, i64)> = BTreeMap::new();

        for order in self.paid_in_range(orders, range) {
            let key = self
                .local_date(order.created_at())
                .format(DATE_FORMAT)
                .to_string();
            let entry = days.entry(key).or_insert((Money::zero(), 0, 0));
            entry.0 += order.total();
            entry.1 += 1;
            entry.2 += order.total_quantity();
        }

        days.into_iter()
            .map(|(date, (total_sales, order_count, items_sold))| SalesBucket {
                date,
                total_sales,
                order_count,
                items_sold,
                average_order_value: total_sales.divide_rounded(order_count as i64),
            })
            .collect()
    }

    /// Best sellers by quantity, descending; ties keep first-seen order.
    pub fn top_selling_items(
        &self,
        orders: &[Order],
        range: &DateRange,
        limit: usize,
    ) -> Vec<ItemSales> {
        let mut ranking: Vec<ItemSales> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for order in self.paid_in_range(orders, range) {
            for line in order.lines() {
                let key = match self.grouping {
                    ItemGrouping::Name => &line.name,
                    ItemGrouping::MenuItemId => &line.menu_item_id,
                };
                match index.get(key) {
                    Some(&i) => {
                        ranking[i].quantity += line.quantity;
                        ranking[i].revenue += line.line_total();
                    }
                    None => {
                        index.insert(key.clone(), ranking.len());
                        ranking.push(ItemSales {
                            name: line.name.clone(),
                            menu_item_id: line.menu_item_id.clone(),
                            quantity: line.quantity,
                            revenue: line.line_total(),
                        });
                    }
                }
            }
        }

        // sort_by is stable
        ranking.sort_by(|a, b| b.quantity.cmp(&a.quantity));
        ranking.truncate(limit);
        ranking
    }

    /// Totals, daily buckets and the configured top-N for a range.
    pub fn summarize(&self, orders: &[Order], range: &DateRange) -> SalesStatistics {
        let daily = self.daily_sales(orders, range);

        let total_revenue: Money = daily.iter().map(|b| b.total_sales).sum();
        let total_orders: u32 = daily.iter().map(|b| b.order_count).sum();
        let total_items: i64 = daily.iter().map(|b| b.items_sold).sum();

        SalesStatistics {
            period_label: range.label(),
            total_revenue,
            total_orders,
            total_items,
            average_order_value: total_revenue.divide_rounded(total_orders as i64),
            daily,
            top_items: self.top_selling_items(orders, range, self.top_limit),
        }
    }

    /// Orders of any status created within the range, input order kept.
    pub fn orders_in_range(&self, orders: Vec<Order>, range: &DateRange) -> Vec<Order> {
        orders
            .into_iter()
            .filter(|o| range.contains(self.local_date(o.created_at())))
            .collect()
    }

    /// Counts orders of every status created within the range.
    pub fn status_counts(&self, orders: &[Order], range: &DateRange) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for order in orders
            .iter()
            .filter(|o| range.contains(self.local_date(o.created_at())))
        {
            match order.status() {
                OrderStatus::Pending => counts.pending += 1,
                OrderStatus::Paid => counts.paid += 1,
                OrderStatus::Cancelled => counts.cancelled += 1,
                OrderStatus::Refunded => counts.refunded += 1,
            }
        }
        counts
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
