//! # Report Command

use clap::Args;

use noodle_core::Period;

use super::{Output, RangeArgs};
use crate::error::AppResult;
use crate::service::{SalesReport, TillService};

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub range: RangeArgs,
}

pub async fn run(args: ReportArgs, service: &TillService, out: &Output) -> AppResult<()> {
    let range = args.range.resolve(service, Period::Today)?;
    let report = service.report(&range).await?;
    out.emit(&report, || render_report(&report, out))
}

pub fn render_report(report: &SalesReport, out: &Output) -> String {
    let stats = &report.statistics;
    let mut text = format!("{}\nSales {}\n\n", report.store_name, stats.period_label);

    text.push_str(&format!("  Revenue        {:>12}\n", out.money(stats.total_revenue)));
    text.push_str(&format!("  Paid orders    {:>12}\n", stats.total_orders));
    text.push_str(&format!("  Items sold     {:>12}\n", stats.total_items));
    text.push_str(&format!(
        "  Average order  {:>12}\n",
        out.money(stats.average_order_value)
    ));

    let counts = &report.status_counts;
    if counts.pending + counts.cancelled + counts.refunded > 0 {
        text.push_str(&format!(
            "  Also: {} pending, {} cancelled, {} refunded\n",
            counts.pending, counts.cancelled, counts.refunded
        ));
    }

    if !stats.daily.is_empty() {
        text.push_str("\nBy day\n");
        for bucket in &stats.daily {
            text.push_str(&format!(
                "  {}  {:>12}  {:>3} orders  {:>4} items\n",
                bucket.date,
                out.money(bucket.total_sales),
                bucket.order_count,
                bucket.items_sold
            ));
        }
    }

    if !stats.top_items.is_empty() {
        text.push_str("\nTop sellers\n");
        for (rank, item) in stats.top_items.iter().enumerate() {
            text.push_str(&format!(
                "  {}. {:<28} {:>4}  {:>12}\n",
                rank + 1,
                item.name,
                item.quantity,
                out.money(item.revenue)
            ));
        }
    }

    text.trim_end().to_string()
}
