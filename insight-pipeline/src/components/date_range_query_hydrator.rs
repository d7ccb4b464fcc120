use chrono::NaiveDate;

use crate::order_loader::OrderRecord;
use crate::query_hydrator::QueryHydrator;
use crate::types::{DateWindow, ReportQuery};

/// Hydrates the query with the dataset's full purchase-date span when no
/// explicit window was requested, so every downstream stage can assume a
/// concrete window.
pub struct DateRangeQueryHydrator {
    min_date: NaiveDate,
    max_date: NaiveDate,
}

impl DateRangeQueryHydrator {
    /// Build from the loaded orders. Returns `None` on empty data, in
    /// which case the pipeline simply runs without a window default.
    pub fn from_orders(orders: &[OrderRecord]) -> Option<Self> {
        let min_date = orders.iter().map(|o| o.purchased_at.date()).min()?;
        let max_date = orders.iter().map(|o| o.purchased_at.date()).max()?;
        Some(Self { min_date, max_date })
    }
}

impl QueryHydrator<ReportQuery> for DateRangeQueryHydrator {
    fn hydrate(&self, query: &ReportQuery) -> Result<ReportQuery, String> {
        if query.window.is_some() {
            return Ok(query.clone());
        }
        Ok(ReportQuery {
            window: Some(DateWindow {
                from: self.min_date,
                to: self.max_date,
            }),
            ..query.clone()
        })
    }

    fn update(&self, query: &mut ReportQuery, hydrated: ReportQuery) {
        query.window = hydrated.window;
    }
}
