mod memory;
mod schema;
mod subscriptions;
mod types;

pub use memory::MemoryStore;
pub use schema::Database;
pub use types::{StoreError, Subscription, SubscriptionStore};
