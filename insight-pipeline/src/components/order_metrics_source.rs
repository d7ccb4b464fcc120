use crate::order_loader::OrderRecord;
use crate::rfm_extractor::extract_profiles;
use crate::source::Source;
use crate::types::{CustomerProfile, ReportQuery};

/// Source that produces `CustomerProfile` candidates from loaded order
/// records: applies the query's date window, then runs RFM extraction
/// over whatever remains.
pub struct OrderMetricsSource {
    orders: Vec<OrderRecord>,
}

impl OrderMetricsSource {
    pub fn new(orders: Vec<OrderRecord>) -> Self {
        Self { orders }
    }
}

impl Source<ReportQuery, CustomerProfile> for OrderMetricsSource {
    fn enable(&self, _query: &ReportQuery) -> bool {
        !self.orders.is_empty()
    }

    fn get_candidates(&self, query: &ReportQuery) -> Result<Vec<CustomerProfile>, String> {
        let profiles = match &query.window {
            Some(window) => {
                let in_window: Vec<OrderRecord> = self
                    .orders
                    .iter()
                    .filter(|o| window.contains(o.purchased_at.date()))
                    .cloned()
                    .collect();
                extract_profiles(&in_window)
            }
            None => extract_profiles(&self.orders),
        };
        Ok(profiles)
    }
}
