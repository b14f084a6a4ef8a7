use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use noodle_core::{
    DateRange, ErrorKind, ItemGrouping, MenuItem, Money, Order, Period, Repository, TaxRate,
};
use noodle_db::MemoryRepository;
use noodle_till::{TillConfig, TillService};

fn canton() -> MenuItem {
    MenuItem::new("pancit-canton", "Pancit Canton", Money::from_cents(2500), "Noodles")
}

fn lomi() -> MenuItem {
    MenuItem::new("lomi", "Lomi", Money::from_cents(3000), "Noodles")
}

fn special() -> MenuItem {
    MenuItem::new("lomi-special", "Lomi", Money::from_cents(4500), "Noodles")
}

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, day, hour, 0, 0).unwrap()
}

fn paid(created_at: DateTime<Utc>, items: &[(MenuItem, i64)]) -> Order {
    let mut order = Order::new_at(TaxRate::zero(), created_at);
    for (item, qty) in items {
        order.add_item(item, *qty).unwrap();
    }
    let total = order.total();
    order.process_payment(total).unwrap();
    order
}

/// 2026-03-02: two paid orders (₱140.00) and a cancelled one.
/// 2026-03-03: one paid order (₱70.00) and one still pending.
async fn seeded(config: TillConfig) -> TillService {
    let repo = Arc::new(MemoryRepository::with_menu(vec![canton(), lomi(), special()]));

    let mut cancelled = Order::new_at(TaxRate::zero(), at(2, 6));
    cancelled.add_item(&lomi(), 5).unwrap();
    cancelled.cancel().unwrap();

    let mut pending = Order::new_at(TaxRate::zero(), at(3, 7));
    pending.add_item(&canton(), 9).unwrap();

    for order in [
        paid(at(2, 4), &[(canton(), 2), (lomi(), 1)]),
        paid(at(2, 9), &[(lomi(), 2)]),
        cancelled,
        paid(at(3, 5), &[(canton(), 1), (special(), 1)]),
        pending,
    ] {
        repo.save_order(&order).await.unwrap();
    }

    TillService::new(repo, &config)
}

fn march() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_report_for_a_month() {
    let till = seeded(TillConfig::default()).await;
    let report = till.report(&march()).await.unwrap();
    let stats = &report.statistics;

    assert_eq!(report.store_name, "Noodle Money Buddy");
    assert_eq!(stats.period_label, "2026-03-01 to 2026-03-31");
    assert_eq!(stats.total_revenue, Money::from_cents(21000));
    assert_eq!(stats.total_orders, 3);
    assert_eq!(stats.total_items, 7);
    assert_eq!(stats.average_order_value, Money::from_cents(7000));

    let days: Vec<_> = stats.daily.iter().map(|b| b.date.as_str()).collect();
    assert_eq!(days, vec!["2026-03-02", "2026-03-03"]);
    let bucket_sum: Money = stats.daily.iter().map(|b| b.total_sales).sum();
    assert_eq!(bucket_sum, stats.total_revenue);

    // Lomi lines merge by name: 1 + 2 + 1 special
    assert_eq!(stats.top_items[0].name, "Lomi");
    assert_eq!(stats.top_items[0].quantity, 4);
    assert_eq!(stats.top_items[1].name, "Pancit Canton");
    assert_eq!(stats.top_items[1].quantity, 3);

    assert_eq!(report.status_counts.paid, 3);
    assert_eq!(report.status_counts.cancelled, 1);
    assert_eq!(report.status_counts.pending, 1);
    assert_eq!(report.status_counts.total(), 5);
}

#[tokio::test]
async fn test_report_groups_by_menu_item_id_when_configured() {
    let mut config = TillConfig::default();
    config.statistics.group_items_by = ItemGrouping::MenuItemId;
    let till = seeded(config).await;

    let top = till.report(&march()).await.unwrap().statistics.top_items;
    let ids: Vec<_> = top.iter().map(|i| (i.menu_item_id.as_str(), i.quantity)).collect();
    assert_eq!(
        ids,
        vec![("pancit-canton", 3), ("lomi", 3), ("lomi-special", 1)]
    );
}

#[tokio::test]
async fn test_report_for_empty_period() {
    let till = seeded(TillConfig::default()).await;
    let range = till.parse_range(Some("2026-04-01"), Some("2026-04-30")).unwrap();
    let report = till.report(&range).await.unwrap();

    assert_eq!(report.statistics.total_revenue, Money::zero());
    assert_eq!(report.statistics.average_order_value, Money::zero());
    assert!(report.statistics.daily.is_empty());
    assert_eq!(report.status_counts.total(), 0);
}

#[tokio::test]
async fn test_lenient_dates_open_the_bound() {
    let till = seeded(TillConfig::default()).await;

    let range = till.parse_range(Some("2026-03-03"), Some("end of march")).unwrap();
    assert_eq!(range.end, None);

    let report = till.report(&range).await.unwrap();
    assert_eq!(report.statistics.total_revenue, Money::from_cents(7000));
    assert_eq!(report.statistics.period_label, "2026-03-03 to latest");
}

#[tokio::test]
async fn test_strict_dates_reject_garbage() {
    let mut config = TillConfig::default();
    config.statistics.strict_dates = true;
    let till = seeded(config).await;

    let err = till.parse_range(Some("2026-03-03"), Some("end of march")).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::InvalidArgument));

    let err = till.parse_range(Some("2026-03-31"), Some("2026-03-01")).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::InvalidArgument));
}

#[tokio::test]
async fn test_shop_offset_moves_orders_across_midnight() {
    let mut config = TillConfig::default();
    // 20:00 UTC on the 2nd is already the 3rd in Manila
    config.statistics.utc_offset_minutes = 8 * 60;
    let repo = Arc::new(MemoryRepository::new());
    repo.save_order(&paid(at(2, 20), &[(lomi(), 1)])).await.unwrap();
    let till = TillService::new(repo, &config);

    let report = till.report(&march()).await.unwrap();
    assert_eq!(report.statistics.daily[0].date, "2026-03-03");

    let csv = till.export_orders(&march()).await.unwrap();
    assert!(csv.contains("2026-03-03 04:00:00"));
}

#[tokio::test]
async fn test_export_orders_csv() {
    let till = seeded(TillConfig::default()).await;
    let range = till.parse_range(Some("2026-03-02"), Some("2026-03-02")).unwrap();
    let csv = till.export_orders(&range).await.unwrap();

    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Order ID,Date,Items,Total Amount,Status");
    // Every status is exported, oldest first
    assert_eq!(lines.len(), 4);
    assert!(lines[1].contains(",2026-03-02 04:00:00,\"Pancit Canton x2; Lomi x1\",80.00,Paid"));
    assert!(lines[2].ends_with(",\"Lomi x2\",60.00,Paid"));
    assert!(lines[3].ends_with(",\"\",0.00,Cancelled"));
}

#[tokio::test]
async fn test_export_daily_sales_csv() {
    let till = seeded(TillConfig::default()).await;
    let csv = till
        .export_daily_sales(&DateRange::all())
        .await
        .unwrap();

    assert_eq!(
        csv,
        "Date,Total Sales,Order Count,Items Sold,Average Order Value\n\
         2026-03-02,140.00,2,5,70.00\n\
         2026-03-03,70.00,1,2,70.00\n"
    );
}

#[tokio::test]
async fn test_export_top_items_csv() {
    let till = seeded(TillConfig::default()).await;

    let csv = till.export_top_items(&march(), Some(1)).await.unwrap();
    assert_eq!(csv, "Rank,Item,Quantity Sold,Revenue\n1,Lomi,4,135.00\n");

    // Default limit comes from config
    let csv = till.export_top_items(&march(), None).await.unwrap();
    assert_eq!(csv.lines().count(), 3);
}

#[tokio::test]
async fn test_named_periods_cover_orders_made_now() {
    let till = seeded(TillConfig::default()).await;
    let order = till.open_order(None, None).await.unwrap();
    till.add_item(order.id(), "lomi", 1).await.unwrap();
    till.tender(order.id(), "30").await.unwrap();

    for period in [Period::Today, Period::ThisWeek, Period::ThisMonth] {
        let range = till.period_range(period);
        let report = till.report(&range).await.unwrap();
        assert!(report.statistics.total_orders >= 1, "{:?}", period);
    }

    let today = till.list_orders(&till.period_range(Period::Today)).await.unwrap();
    assert!(today.iter().any(|o| o.id() == order.id()));
}
