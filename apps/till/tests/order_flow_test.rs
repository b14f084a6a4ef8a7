use std::sync::Arc;

use noodle_core::{ErrorKind, MenuItem, Money, OrderStatus, PaymentOutcome, Repository};
use noodle_db::MemoryRepository;
use noodle_till::{AppError, ErrorCode, TillConfig, TillService};

fn menu() -> Vec<MenuItem> {
    vec![
        MenuItem::new("pancit-canton", "Pancit Canton", Money::from_cents(2500), "Noodles"),
        MenuItem::new("lomi", "Lomi", Money::from_cents(3000), "Noodles"),
        MenuItem::new("batchoy", "La Paz Batchoy", Money::from_cents(4500), "Noodles")
            .with_availability(false),
    ]
}

fn till() -> (Arc<MemoryRepository>, TillService) {
    till_with(TillConfig::default())
}

fn till_with(config: TillConfig) -> (Arc<MemoryRepository>, TillService) {
    let repo = Arc::new(MemoryRepository::with_menu(menu()));
    let service = TillService::new(repo.clone(), &config);
    (repo, service)
}

fn kind(err: &AppError) -> Option<ErrorKind> {
    err.kind()
}

#[tokio::test]
async fn test_counter_order_paid_in_two_tenders() {
    let (repo, till) = till();
    let order = till.open_order(Some("Mang Tomas"), None).await.unwrap();

    till.add_item(order.id(), "pancit-canton", 2).await.unwrap();
    let order = till.add_item(order.id(), "lomi", 1).await.unwrap();
    assert_eq!(order.subtotal(), Money::from_cents(8000));
    assert_eq!(order.total(), Money::from_cents(8000));

    let first = till.tender(order.id(), "50").await.unwrap();
    assert_eq!(
        first.outcome,
        PaymentOutcome::PartialPayment {
            remaining: Money::from_cents(3000)
        }
    );
    assert_eq!(first.order.status(), OrderStatus::Pending);

    let second = till.tender(order.id(), "30.00").await.unwrap();
    assert_eq!(
        second.outcome,
        PaymentOutcome::Success {
            change: Money::zero()
        }
    );

    let stored = repo.get_order(order.id()).await.unwrap().unwrap();
    assert_eq!(stored.status(), OrderStatus::Paid);
    assert_eq!(stored.payment_amount(), Money::from_cents(8000));
    assert_eq!(stored.change_amount(), Money::zero());
    assert_eq!(stored.customer_name(), Some("Mang Tomas"));
}

#[tokio::test]
async fn test_single_tender_gives_change() {
    let (_, till) = till();
    let order = till.open_order(None, None).await.unwrap();
    till.add_item(order.id(), "pancit-canton", 2).await.unwrap();
    till.add_item(order.id(), "lomi", 1).await.unwrap();

    let result = till.tender(order.id(), "100").await.unwrap();
    assert_eq!(
        result.outcome,
        PaymentOutcome::Success {
            change: Money::from_cents(2000)
        }
    );
    assert!(result.warnings.is_empty());
}

#[tokio::test]
async fn test_huge_tender_warns_but_pays() {
    let (_, till) = till();
    let order = till.open_order(None, None).await.unwrap();
    till.add_item(order.id(), "lomi", 1).await.unwrap();

    let result = till.tender(order.id(), "1000").await.unwrap();
    assert!(result.outcome.is_complete());
    assert_eq!(result.warnings.len(), 1);
}

#[tokio::test]
async fn test_same_item_merges_into_one_line() {
    let (_, till) = till();
    let order = till.open_order(None, None).await.unwrap();
    till.add_item(order.id(), "lomi", 1).await.unwrap();
    let order = till.add_item(order.id(), "lomi", 2).await.unwrap();

    assert_eq!(order.lines().len(), 1);
    assert_eq!(order.lines()[0].quantity, 3);
}

#[tokio::test]
async fn test_unknown_and_unavailable_items() {
    let (_, till) = till();
    let order = till.open_order(None, None).await.unwrap();

    let err = till.add_item(order.id(), "spaghetti", 1).await.unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::NotFound));

    let err = till.add_item(order.id(), "batchoy", 1).await.unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::InvalidState));
    assert_eq!(err.code(), ErrorCode::BusinessLogic);

    assert!(till.order(order.id()).await.unwrap().lines().is_empty());
}

#[tokio::test]
async fn test_quantity_updates_from_typed_input() {
    let (_, till) = till();
    let order = till.open_order(None, None).await.unwrap();
    till.add_item(order.id(), "pancit-canton", 2).await.unwrap();
    till.add_item(order.id(), "lomi", 1).await.unwrap();

    let order = till.set_quantity(order.id(), "lomi", " 4 ").await.unwrap();
    assert_eq!(order.line_for_item("lomi").unwrap().quantity, 4);

    let err = till.set_quantity(order.id(), "lomi", "four").await.unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::InvalidArgument));

    // Unknown line is a no-op
    let unchanged = till.set_quantity(order.id(), "no-such-line", "5").await.unwrap();
    assert_eq!(unchanged.total_quantity(), 6);

    // Zero removes the line
    let order = till.set_quantity(order.id(), "lomi", "0").await.unwrap();
    assert_eq!(order.lines().len(), 1);
    assert!(order.line_for_item("lomi").is_none());
}

#[tokio::test]
async fn test_remove_line_by_line_id() {
    let (_, till) = till();
    let order = till.open_order(None, None).await.unwrap();
    let order = till.add_item(order.id(), "lomi", 1).await.unwrap();
    let line_id = order.lines()[0].id.clone();

    let order = till.remove_line(order.id(), &line_id).await.unwrap();
    assert!(order.lines().is_empty());

    // Removing again leaves the order alone
    let order = till.remove_line(order.id(), &line_id).await.unwrap();
    assert!(order.lines().is_empty());
}

#[tokio::test]
async fn test_rejected_tender_leaves_order_unchanged() {
    let (repo, till) = till();
    let order = till.open_order(None, None).await.unwrap();
    till.add_item(order.id(), "lomi", 1).await.unwrap();

    for bad in ["0", "-5", "abc", "12.345", ""] {
        let err = till.tender(order.id(), bad).await.unwrap_err();
        assert_eq!(kind(&err), Some(ErrorKind::InvalidArgument), "tender {:?}", bad);
        assert_eq!(err.code(), ErrorCode::PaymentError);
    }

    let stored = repo.get_order(order.id()).await.unwrap().unwrap();
    assert_eq!(stored.payment_amount(), Money::zero());
    assert_eq!(stored.status(), OrderStatus::Pending);
}

#[tokio::test]
async fn test_oversized_tender_after_partial_payment_is_rejected() {
    let (repo, till) = till();
    let order = till.open_order(None, None).await.unwrap();
    till.add_item(order.id(), "lomi", 1).await.unwrap();
    till.tender(order.id(), "10.00").await.unwrap();

    let err = till.tender(order.id(), "92233720368547758").await.unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::InvalidArgument));
    assert_eq!(err.code(), ErrorCode::PaymentError);

    let stored = repo.get_order(order.id()).await.unwrap().unwrap();
    assert_eq!(stored.payment_amount(), Money::from_cents(1000));
    assert_eq!(stored.status(), OrderStatus::Pending);

    let result = till.tender(order.id(), "20").await.unwrap();
    assert!(result.outcome.is_complete());
}

#[tokio::test]
async fn test_payment_session() {
    let (_, till) = till();
    let order = till.open_order(None, None).await.unwrap();

    // Nothing to pay for yet
    let err = till.begin_payment(order.id()).await.unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::InvalidState));
    assert_eq!(err.code(), ErrorCode::OrderError);

    till.add_item(order.id(), "pancit-canton", 2).await.unwrap();
    till.tender(order.id(), "20").await.unwrap();

    let session = till.begin_payment(order.id()).await.unwrap();
    assert_eq!(session.required, Money::from_cents(5000));
    assert_eq!(session.current, Money::from_cents(2000));
    assert_eq!(session.remaining, Money::from_cents(3000));

    let err = till.begin_payment("missing").await.unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::NotFound));
}

#[tokio::test]
async fn test_cancel_is_idempotent_and_paid_orders_refund() {
    let (_, till) = till();
    let order = till.open_order(None, None).await.unwrap();
    till.add_item(order.id(), "lomi", 2).await.unwrap();

    let cancelled = till.cancel(order.id()).await.unwrap();
    assert_eq!(cancelled.status(), OrderStatus::Cancelled);
    assert!(cancelled.lines().is_empty());
    let again = till.cancel(order.id()).await.unwrap();
    assert_eq!(again.status(), OrderStatus::Cancelled);

    let err = till.add_item(order.id(), "lomi", 1).await.unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::InvalidState));

    let paid = till.open_order(None, None).await.unwrap();
    till.add_item(paid.id(), "lomi", 1).await.unwrap();
    till.tender(paid.id(), "30").await.unwrap();

    let err = till.cancel(paid.id()).await.unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::InvalidState));

    let refunded = till.refund(paid.id()).await.unwrap();
    assert_eq!(refunded.status(), OrderStatus::Refunded);
    assert!(till.refund(paid.id()).await.is_err());
}

#[tokio::test]
async fn test_discard_only_orders_without_money() {
    let (repo, till) = till();
    let open = till.open_order(None, None).await.unwrap();
    till.discard(open.id()).await.unwrap();
    assert!(repo.get_order(open.id()).await.unwrap().is_none());

    let paid = till.open_order(None, None).await.unwrap();
    till.add_item(paid.id(), "lomi", 1).await.unwrap();
    till.tender(paid.id(), "30").await.unwrap();
    let err = till.discard(paid.id()).await.unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::InvalidState));

    let err = till.discard("missing").await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn test_configured_tax_rate_applies_to_new_orders() {
    let mut config = TillConfig::default();
    config.pricing.tax_rate_bps = 1200;
    let (_, till) = till_with(config);

    let order = till.open_order(None, None).await.unwrap();
    let order = till.add_item(order.id(), "pancit-canton", 2).await.unwrap();

    assert_eq!(order.subtotal(), Money::from_cents(5000));
    assert_eq!(order.tax(), Money::from_cents(600));
    assert_eq!(order.total(), Money::from_cents(5600));

    let result = till.tender(order.id(), "56").await.unwrap();
    assert!(result.outcome.is_complete());
}

#[tokio::test]
async fn test_menu_upsert_and_validation() {
    let (_, till) = till();

    till.upsert_menu_item(MenuItem::new("mami", "Beef Mami", Money::from_cents(4000), "Noodles"))
        .await
        .unwrap();
    let catalog = till.menu().await.unwrap();
    assert_eq!(catalog.len(), 4);
    assert_eq!(catalog.available().count(), 3);

    // Switching batchoy back on makes it orderable
    till.upsert_menu_item(MenuItem::new("batchoy", "La Paz Batchoy", Money::from_cents(4500), "Noodles"))
        .await
        .unwrap();
    let order = till.open_order(None, None).await.unwrap();
    assert!(till.add_item(order.id(), "batchoy", 1).await.is_ok());

    let err = till
        .upsert_menu_item(MenuItem::new("free", "Free Soup", Money::zero(), "Sides"))
        .await
        .unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::InvalidArgument));
}

#[tokio::test]
async fn test_sold_out_toggle() {
    let (repo, till) = till();
    let order = till.open_order(None, None).await.unwrap();
    till.add_item(order.id(), "lomi", 1).await.unwrap();

    let item = till.set_availability("lomi", false).await.unwrap();
    assert!(!item.is_available);
    let err = till.add_item(order.id(), "lomi", 1).await.unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::InvalidState));

    // The line already on the order can still be paid
    let result = till.tender(order.id(), "30").await.unwrap();
    assert!(result.outcome.is_complete());

    till.set_availability("batchoy", true).await.unwrap();
    let stored = repo.list_menu_items().await.unwrap();
    let batchoy = stored.iter().find(|i| i.id == "batchoy").unwrap();
    assert!(batchoy.is_available);
    assert_eq!(batchoy.price, Money::from_cents(4500));

    let err = till.set_availability("sisig", true).await.unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::NotFound));
}

#[tokio::test]
async fn test_store_failure_surfaces_as_persistence_failure() {
    let (repo, till) = till();
    let order = till.open_order(None, None).await.unwrap();

    repo.set_offline(true);

    let err = till.add_item(order.id(), "lomi", 1).await.unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::PersistenceFailure));
    assert_eq!(err.code(), ErrorCode::DatabaseError);

    let err = till.open_order(None, None).await.unwrap_err();
    assert_eq!(kind(&err), Some(ErrorKind::PersistenceFailure));

    repo.set_offline(false);
    assert!(till.add_item(order.id(), "lomi", 1).await.is_ok());
}
