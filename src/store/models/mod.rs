pub mod customer;
pub mod order;
pub mod transaction;
pub mod widget;

pub use customer::{Customer, NewCustomer};
pub use order::{NewOrder, Order, OrderStatus};
pub use transaction::{NewTransaction, Transaction, TransactionStatus};
pub use widget::Widget;
