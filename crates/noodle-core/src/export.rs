//! # CSV Export
//!
//! Renders orders and statistics as CSV text. Writing the text to a file or
//! share target is the caller's job.
//!
//! ## Formats
//! ```text
//! orders:     Order ID,Date,Items,Total Amount,Status
//!             3f2a..,2026-03-02 12:00:00,"Pancit Canton x2; Lomi x1",80.00,Paid
//!
//! daily:      Date,Total Sales,Order Count,Items Sold,Average Order Value
//!             2026-03-02,140.00,2,5,70.00
//!
//! top items:  Rank,Item,Quantity Sold,Revenue
//!             1,Pancit Canton,3,75.00
//! ```
//!
//! ## Quoting
//! RFC 4180. The items column is always quoted; any other field is quoted
//! only when it contains a comma, quote or line break. Embedded quotes are
//! doubled. Money is always two decimals with no symbol.

use chrono::FixedOffset;

use crate::order::Order;
use crate::statistics::{ItemSales, SalesBucket};

pub const ORDERS_HEADER: &str = "Order ID,Date,Items,Total Amount,Status";
pub const DAILY_SALES_HEADER: &str = "Date,Total Sales,Order Count,Items Sold,Average Order Value";
pub const TOP_ITEMS_HEADER: &str = "Rank,Item,Quantity Sold,Revenue";

const LINE_END: &str = "\n";

/// One row per order, timestamps rendered at the given offset.
pub fn orders_to_csv(orders: &[Order], offset: FixedOffset) -> String {
    let mut out = String::from(ORDERS_HEADER);
    out.push_str(LINE_END);

    for order in orders {
        let date = order
            .created_at()
            .with_timezone(&offset)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();

        let row = [
            escape_field(order.id()),
            escape_field(&date),
            quote(&items_summary(order)),
            order.total().to_plain_string(),
            order.status().label().to_string(),
        ];
        out.push_str(&row.join(","));
        out.push_str(LINE_END);
    }

    out
}

/// One row per daily bucket.
pub fn daily_sales_to_csv(buckets: &[SalesBucket]) -> String {
    let mut out = String::from(DAILY_SALES_HEADER);
    out.push_str(LINE_END);

    for bucket in buckets {
        out.push_str(&format!(
            "{},{},{},{},{}{}",
            escape_field(&bucket.date),
            bucket.total_sales.to_plain_string(),
            bucket.order_count,
            bucket.items_sold,
            bucket.average_order_value.to_plain_string(),
            LINE_END
        ));
    }

    out
}

/// Ranked best sellers, rank starting at 1.
pub fn top_items_to_csv(items: &[ItemSales]) -> String {
    let mut out = String::from(TOP_ITEMS_HEADER);
    out.push_str(LINE_END);

    for (rank, item) in items.iter().enumerate() {
        out.push_str(&format!(
            "{},{},{},{}{}",
            rank + 1,
            escape_field(&item.name),
            item.quantity,
            item.revenue.to_plain_string(),
            LINE_END
        ));
    }

    out
}

/// `"Name xQty; Name xQty"` in line order.
pub fn items_summary(order: &Order) -> String {
    order
        .lines()
        .iter()
        .map(|line| format!("{} x{}", line.name, line.quantity))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Quotes a field only when it needs it.
pub fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        quote(field)
    } else {
        field.to_string()
    }
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{MenuItem, TaxRate};
    use chrono::{TimeZone, Utc};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn sample_order() -> Order {
        let at = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        let mut order = Order::new_at(TaxRate::zero(), at);
        order
            .add_item(
                &MenuItem::new("pancit-canton", "Pancit Canton", Money::from_cents(2500), "Noodles"),
                2,
            )
            .unwrap();
        order
            .add_item(&MenuItem::new("lomi", "Lomi", Money::from_cents(3000), "Noodles"), 1)
            .unwrap();
        order.process_payment(Money::from_cents(8000)).unwrap();
        order
    }

    #[test]
    fn test_orders_csv() {
        let order = sample_order();
        let csv = orders_to_csv(std::slice::from_ref(&order), utc());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], ORDERS_HEADER);
        assert_eq!(
            lines[1],
            format!(
                "{},2026-03-02 12:00:00,\"Pancit Canton x2; Lomi x1\",80.00,Paid",
                order.id()
            )
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_orders_csv_uses_offset() {
        let order = sample_order();
        let manila = FixedOffset::east_opt(8 * 3600).unwrap();
        let csv = orders_to_csv(&[order], manila);
        assert!(csv.contains("2026-03-02 20:00:00"));
    }

    #[test]
    fn test_embedded_quotes_are_doubled() {
        let at = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
        let mut order = Order::new_at(TaxRate::zero(), at);
        order
            .add_item(
                &MenuItem::new("special", "Mami \"Special\", Large", Money::from_cents(6000), "Noodles"),
                1,
            )
            .unwrap();

        let csv = orders_to_csv(&[order], utc());
        assert!(csv.contains(r#","Mami ""Special"", Large x1",60.00,Pending"#));
    }

    #[test]
    fn test_daily_sales_csv() {
        let buckets = vec![SalesBucket {
            date: "2026-03-02".to_string(),
            total_sales: Money::from_cents(14000),
            order_count: 2,
            items_sold: 5,
            average_order_value: Money::from_cents(7000),
        }];

        let csv = daily_sales_to_csv(&buckets);
        assert_eq!(
            csv,
            "Date,Total Sales,Order Count,Items Sold,Average Order Value\n2026-03-02,140.00,2,5,70.00\n"
        );
        assert_eq!(daily_sales_to_csv(&[]), format!("{}\n", DAILY_SALES_HEADER));
    }

    #[test]
    fn test_top_items_csv() {
        let items = vec![
            ItemSales {
                name: "Pancit Canton".to_string(),
                menu_item_id: "pancit-canton".to_string(),
                quantity: 3,
                revenue: Money::from_cents(7500),
            },
            ItemSales {
                name: "Tea, iced".to_string(),
                menu_item_id: "iced-tea".to_string(),
                quantity: 1,
                revenue: Money::from_cents(1500),
            },
        ];

        let csv = top_items_to_csv(&items);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], TOP_ITEMS_HEADER);
        assert_eq!(lines[1], "1,Pancit Canton,3,75.00");
        assert_eq!(lines[2], "2,\"Tea, iced\",1,15.00");
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
