#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;

use widget_shop::cards::{
    CardSnapshot, ChargeList, ChargeSnapshot, PaymentGateway, PaymentIntentId,
    PaymentIntentSnapshot, PaymentMethodId, PaymentMethodSnapshot, ProviderError,
};
use widget_shop::checkout::{CheckoutService, PaymentConfirmation};
use widget_shop::store::models::{
    Customer, NewCustomer, NewOrder, NewTransaction, Order, Transaction, Widget,
};
use widget_shop::store::{SaleScope, SaleStore, StoreError};

/// In-memory provider stub. Holds canned snapshots per identifier and can be
/// told to fail its next lookup.
pub struct MockPaymentGateway {
    intents: Mutex<HashMap<String, PaymentIntentSnapshot>>,
    methods: Mutex<HashMap<String, PaymentMethodSnapshot>>,
    fail_next: Mutex<bool>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self {
            intents: Mutex::new(HashMap::new()),
            methods: Mutex::new(HashMap::new()),
            fail_next: Mutex::new(false),
        }
    }

    /// Standard fixture: intent `pi_123` with charge `ch_789`, method
    /// `pm_456` for a 4242 card expiring 12/2030.
    pub fn confirmed() -> Self {
        let gateway = Self::new();
        gateway.add_intent("pi_123", "ch_789", 150000, "idr");
        gateway.add_method("pm_456", "4242", 12, 2030);
        gateway
    }

    pub fn add_intent(&self, id: &str, charge_id: &str, amount: i64, currency: &str) {
        self.intents.lock().unwrap().insert(
            id.to_string(),
            PaymentIntentSnapshot {
                id: PaymentIntentId(id.to_string()),
                amount,
                currency: currency.to_string(),
                status: "succeeded".to_string(),
                charges: ChargeList {
                    data: vec![ChargeSnapshot {
                        id: charge_id.to_string(),
                        status: Some("succeeded".to_string()),
                    }],
                },
            },
        );
    }

    pub fn add_method(&self, id: &str, last4: &str, exp_month: u32, exp_year: u32) {
        self.methods.lock().unwrap().insert(
            id.to_string(),
            PaymentMethodSnapshot {
                id: PaymentMethodId(id.to_string()),
                card: CardSnapshot {
                    last4: last4.to_string(),
                    exp_month,
                    exp_year,
                    brand: Some("visa".to_string()),
                },
            },
        );
    }

    pub fn set_fail_next(&self, fail: bool) {
        *self.fail_next.lock().unwrap() = fail;
    }

    fn take_failure(&self) -> Option<ProviderError> {
        let mut fail = self.fail_next.lock().unwrap();
        if *fail {
            *fail = false;
            Some(ProviderError::Api {
                status: 503,
                message: "mock configured to fail".to_string(),
            })
        } else {
            None
        }
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn retrieve_payment_intent(
        &self,
        id: &PaymentIntentId,
    ) -> Result<PaymentIntentSnapshot, ProviderError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        self.intents
            .lock()
            .unwrap()
            .get(&id.0)
            .cloned()
            .ok_or_else(|| ProviderError::Api {
                status: 404,
                message: format!("no such payment_intent: {}", id),
            })
    }

    async fn retrieve_payment_method(
        &self,
        id: &PaymentMethodId,
    ) -> Result<PaymentMethodSnapshot, ProviderError> {
        if let Some(err) = self.take_failure() {
            return Err(err);
        }
        self.methods
            .lock()
            .unwrap()
            .get(&id.0)
            .cloned()
            .ok_or_else(|| ProviderError::Api {
                status: 404,
                message: format!("no such payment_method: {}", id),
            })
    }
}

#[derive(Debug, Default)]
pub struct SaleRows {
    pub customers: Vec<Customer>,
    pub transactions: Vec<Transaction>,
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Customer,
    Transaction,
    Order,
    Commit,
}

/// In-memory sale store with transactional scope semantics: writes are
/// staged on the scope and only reach the shared rows on commit, so a
/// dropped or failed scope leaves nothing behind - same contract as the
/// Postgres implementation.
pub struct MockSaleStore {
    pub widgets: Vec<Widget>,
    pub rows: Arc<Mutex<SaleRows>>,
    fail_on: Mutex<Option<FailPoint>>,
}

impl MockSaleStore {
    pub fn new(widgets: Vec<Widget>) -> Self {
        Self {
            widgets,
            rows: Arc::new(Mutex::new(SaleRows::default())),
            fail_on: Mutex::new(None),
        }
    }

    pub fn set_fail_on(&self, point: Option<FailPoint>) {
        *self.fail_on.lock().unwrap() = point;
    }
}

#[async_trait]
impl SaleStore for MockSaleStore {
    async fn get_widget(&self, id: i64) -> Result<Widget, StoreError> {
        self.widgets
            .iter()
            .find(|w| w.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("widget {}", id)))
    }

    async fn begin_sale(&self) -> Result<Box<dyn SaleScope>, StoreError> {
        Ok(Box::new(MockScope {
            rows: Arc::clone(&self.rows),
            staged: SaleRows::default(),
            fail_on: *self.fail_on.lock().unwrap(),
        }))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

struct MockScope {
    rows: Arc<Mutex<SaleRows>>,
    staged: SaleRows,
    fail_on: Option<FailPoint>,
}

#[async_trait]
impl SaleScope for MockScope {
    async fn find_customer_by_email(
        &mut self,
        email: &str,
    ) -> Result<Option<Customer>, StoreError> {
        let committed = self.rows.lock().unwrap();
        Ok(committed
            .customers
            .iter()
            .chain(self.staged.customers.iter())
            .find(|c| c.email == email)
            .cloned())
    }

    async fn insert_customer(&mut self, customer: NewCustomer) -> Result<i64, StoreError> {
        if self.fail_on == Some(FailPoint::Customer) {
            return Err(StoreError::Timeout);
        }
        let id =
            self.rows.lock().unwrap().customers.len() as i64 + self.staged.customers.len() as i64 + 1;
        let now = Utc::now();
        self.staged.customers.push(Customer {
            id,
            first_name: customer.first_name,
            last_name: customer.last_name,
            email: customer.email,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn insert_transaction(&mut self, txn: NewTransaction) -> Result<i64, StoreError> {
        if self.fail_on == Some(FailPoint::Transaction) {
            return Err(StoreError::Timeout);
        }
        let id = self.rows.lock().unwrap().transactions.len() as i64
            + self.staged.transactions.len() as i64
            + 1;
        let now = Utc::now();
        self.staged.transactions.push(Transaction {
            id,
            amount: txn.amount,
            currency: txn.currency,
            last_four: txn.last_four,
            expiry_month: txn.expiry_month,
            expiry_year: txn.expiry_year,
            payment_intent: txn.payment_intent.0,
            payment_method: txn.payment_method.0,
            bank_return_code: txn.bank_return_code,
            transaction_status_id: txn.status.id(),
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn insert_order(&mut self, order: NewOrder) -> Result<i64, StoreError> {
        if self.fail_on == Some(FailPoint::Order) {
            return Err(StoreError::Timeout);
        }
        let id =
            self.rows.lock().unwrap().orders.len() as i64 + self.staged.orders.len() as i64 + 1;
        let now = Utc::now();
        self.staged.orders.push(Order {
            id,
            widget_id: order.widget_id,
            transaction_id: order.transaction_id,
            customer_id: order.customer_id,
            status_id: order.status.id(),
            quantity: order.quantity,
            amount: order.amount,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn commit(mut self: Box<Self>) -> Result<(), StoreError> {
        if self.fail_on == Some(FailPoint::Commit) {
            return Err(StoreError::Timeout);
        }
        let mut rows = self.rows.lock().unwrap();
        rows.customers.append(&mut self.staged.customers);
        rows.transactions.append(&mut self.staged.transactions);
        rows.orders.append(&mut self.staged.orders);
        Ok(())
    }
}

pub fn sample_widget(id: i64) -> Widget {
    let now = Utc::now();
    Widget {
        id,
        name: "Pocket Widget".to_string(),
        description: "Small enough to lose.".to_string(),
        inventory_level: 25,
        price: 150000,
        image: "/static/widget-pocket.png".to_string(),
        created_at: now,
        updated_at: now,
    }
}

/// The submission from the end-to-end scenario: Jane Doe buying widget 3
/// for Rp 150.000.
pub fn jane_submission() -> PaymentConfirmation {
    PaymentConfirmation {
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        email: "jane@example.com".to_string(),
        payment_intent: PaymentIntentId("pi_123".to_string()),
        payment_method: PaymentMethodId("pm_456".to_string()),
        payment_amount: "Rp 150.000".to_string(),
        payment_currency: "idr".to_string(),
        product_id: 3,
    }
}

pub struct Harness {
    pub service: CheckoutService,
    pub store: Arc<MockSaleStore>,
    pub payments: Arc<MockPaymentGateway>,
}

pub fn harness(dedupe_customers: bool) -> Harness {
    let store = Arc::new(MockSaleStore::new(vec![sample_widget(3)]));
    let payments = Arc::new(MockPaymentGateway::confirmed());
    let service = CheckoutService::new(
        payments.clone() as Arc<dyn PaymentGateway>,
        store.clone() as Arc<dyn SaleStore>,
        dedupe_customers,
    );
    Harness {
        service,
        store,
        payments,
    }
}
