//! Tests for the investment service.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::errors::Error;
use crate::events::MockDataChangedSink;
use crate::investments::{
    InvestmentRepositoryTrait, InvestmentService, InvestmentServiceTrait, InvestmentUpdate,
    NewInvestment,
};
use crate::payments::{Payment, PaymentRepositoryTrait};
use crate::test_support::{MemoryInvestmentRepository, MemoryPaymentRepository};

struct Fixture {
    invests: Arc<MemoryInvestmentRepository>,
    payments: Arc<MemoryPaymentRepository>,
    sink: Arc<MockDataChangedSink>,
    service: InvestmentService,
}

fn fixture() -> Fixture {
    let invests = Arc::new(MemoryInvestmentRepository::new());
    let payments = Arc::new(MemoryPaymentRepository::new());
    let sink = Arc::new(MockDataChangedSink::new());
    let service = InvestmentService::new(invests.clone(), payments.clone(), sink.clone());
    Fixture {
        invests,
        payments,
        sink,
        service,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn payment(id: &str, invest_id: &str, amount: f64, is_paid: bool) -> Payment {
    Payment {
        id: id.to_string(),
        invest_id: invest_id.to_string(),
        amount,
        due_date: date(2026, 3, 15),
        is_paid,
        last_modified: Utc::now(),
    }
}

#[tokio::test]
async fn test_create_investment_assigns_id_and_publishes() {
    let f = fixture();
    let created = f
        .service
        .create_investment(NewInvestment {
            amount: 1000.0,
            ratio: Some(0.025),
            created_date: date(2026, 1, 15),
        })
        .await
        .unwrap();

    assert!(!created.id.is_empty());
    assert!(created.is_active);
    assert!(created.closed_date.is_none());
    assert_eq!(f.sink.publish_count(), 1);
}

#[tokio::test]
async fn test_create_investment_rejects_non_positive_amount() {
    let f = fixture();
    let result = f
        .service
        .create_investment(NewInvestment {
            amount: 0.0,
            ratio: None,
            created_date: date(2026, 1, 15),
        })
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));
    assert_eq!(f.sink.publish_count(), 0);
}

#[tokio::test]
async fn test_create_investment_rejects_ratio_above_one() {
    let f = fixture();
    let result = f
        .service
        .create_investment(NewInvestment {
            amount: 1000.0,
            ratio: Some(1.5),
            created_date: date(2026, 1, 15),
        })
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_update_amount_recomputes_unpaid_payments_only() {
    let f = fixture();
    let created = f
        .service
        .create_investment(NewInvestment {
            amount: 1000.0,
            ratio: Some(0.025),
            created_date: date(2026, 1, 15),
        })
        .await
        .unwrap();

    f.payments.seed(payment("paid", &created.id, 25.0, true));
    f.payments.seed(payment("unpaid", &created.id, 25.0, false));

    f.service
        .update_investment(InvestmentUpdate {
            id: created.id.clone(),
            amount: 2000.0,
            created_date: None,
        })
        .await
        .unwrap();

    // Unpaid recomputed to round(2000 * 0.025) = 50, paid history untouched.
    assert_eq!(f.payments.get_payment("unpaid").unwrap().amount, 50.0);
    assert_eq!(f.payments.get_payment("paid").unwrap().amount, 25.0);
}

#[tokio::test]
async fn test_update_bumps_last_modified() {
    let f = fixture();
    let created = f
        .service
        .create_investment(NewInvestment {
            amount: 1000.0,
            ratio: None,
            created_date: date(2026, 1, 15),
        })
        .await
        .unwrap();

    let updated = f
        .service
        .update_investment(InvestmentUpdate {
            id: created.id.clone(),
            amount: 1500.0,
            created_date: Some(date(2026, 1, 20)),
        })
        .await
        .unwrap();

    assert!(updated.last_modified >= created.last_modified);
    assert_eq!(updated.created_date, date(2026, 1, 20));
}

#[tokio::test]
async fn test_close_settles_all_unpaid_payments() {
    let f = fixture();
    let created = f
        .service
        .create_investment(NewInvestment {
            amount: 1000.0,
            ratio: None,
            created_date: date(2026, 1, 15),
        })
        .await
        .unwrap();

    f.payments.seed(payment("u1", &created.id, 50.0, false));
    f.payments.seed(payment("u2", &created.id, 50.0, false));
    f.payments.seed(payment("other", "someone-else", 10.0, false));

    let closed = f.service.close_investment(&created.id).await.unwrap();

    assert!(!closed.is_active);
    assert!(closed.closed_date.is_some());
    assert!(f.payments.get_payment("u1").unwrap().is_paid);
    assert!(f.payments.get_payment("u2").unwrap().is_paid);
    // Payments of other investments are untouched.
    assert!(!f.payments.get_payment("other").unwrap().is_paid);
    assert!(!f.invests.get_investment(&created.id).unwrap().is_active);
}

#[tokio::test]
async fn test_close_twice_is_rejected() {
    let f = fixture();
    let created = f
        .service
        .create_investment(NewInvestment {
            amount: 1000.0,
            ratio: None,
            created_date: date(2026, 1, 15),
        })
        .await
        .unwrap();

    f.service.close_investment(&created.id).await.unwrap();
    let result = f.service.close_investment(&created.id).await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn test_close_missing_investment_is_not_found() {
    let f = fixture();
    let result = f.service.close_investment("missing").await;
    assert!(matches!(
        result,
        Err(Error::Database(crate::errors::DatabaseError::NotFound(_)))
    ));
}
