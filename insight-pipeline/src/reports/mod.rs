//! Pure report builders over validated order records.
//!
//! Each builder is an independent function with no side effects; every
//! table the presentation layer shows comes from one of them.

pub mod category_revenue;
pub mod delivery_review;
pub mod monthly_trend;
pub mod overview;
pub mod payment_methods;

pub use category_revenue::category_revenue;
pub use delivery_review::delivery_review;
pub use monthly_trend::monthly_trend;
pub use overview::overview;
pub use payment_methods::payment_methods;
