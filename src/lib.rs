pub mod features;
pub mod models;
pub mod shared;

pub use features::subscriptions::{JsonRepository, MemoryRepository, SubscriptionRepository};
pub use models::{PaymentFrequency, Subscription, SubscriptionRecord};
pub use shared::config::{
    initialize_application, initialize_logging_system, load_environment_variables,
    InitializationResult,
};
pub use shared::errors::{AppError, AppResult, ErrorSeverity};
