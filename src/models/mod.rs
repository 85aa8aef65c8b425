pub mod subscription;

pub use subscription::{PaymentFrequency, Subscription, SubscriptionRecord};
