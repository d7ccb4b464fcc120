use crate::hydrator::Hydrator;
use crate::segment_classifier::{classify_bands, BandCuts};
use crate::types::{CustomerProfile, ReportQuery};

/// Attaches the behavioral segment derived from a candidate's bands.
///
/// Runs after the quantile band scorer; a candidate that somehow lacks
/// bands is left unclassified rather than guessed at.
pub struct SegmentHydrator;

impl Hydrator<ReportQuery, CustomerProfile> for SegmentHydrator {
    fn hydrate(
        &self,
        query: &ReportQuery,
        candidates: &[CustomerProfile],
    ) -> Result<Vec<CustomerProfile>, String> {
        let cuts = BandCuts::for_bands(query.bands);
        let hydrated = candidates
            .iter()
            .map(|c| {
                let segment = match (c.r_band, c.f_band, c.m_band) {
                    (Some(r), Some(f), Some(m)) => Some(classify_bands(r, f, m, cuts)),
                    _ => None,
                };
                CustomerProfile {
                    segment,
                    ..CustomerProfile::default()
                }
            })
            .collect();
        Ok(hydrated)
    }

    fn update(&self, candidate: &mut CustomerProfile, hydrated: CustomerProfile) {
        candidate.segment = hydrated.segment;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Segment;

    #[test]
    fn attaches_segment_from_bands() {
        let mut candidate = CustomerProfile {
            customer_id: "cust-a".into(),
            r_band: Some(4),
            f_band: Some(4),
            m_band: Some(4),
            ..CustomerProfile::default()
        };
        let hydrator = SegmentHydrator;
        let query = ReportQuery::new("test");
        let hydrated = hydrator.hydrate(&query, std::slice::from_ref(&candidate)).unwrap();
        hydrator.update(&mut candidate, hydrated.into_iter().next().unwrap());
        assert_eq!(candidate.segment, Some(Segment::Champions));
    }

    #[test]
    fn unbanded_candidate_stays_unclassified() {
        let mut candidate = CustomerProfile {
            customer_id: "cust-a".into(),
            ..CustomerProfile::default()
        };
        let hydrator = SegmentHydrator;
        let query = ReportQuery::new("test");
        let hydrated = hydrator.hydrate(&query, std::slice::from_ref(&candidate)).unwrap();
        hydrator.update(&mut candidate, hydrated.into_iter().next().unwrap());
        assert_eq!(candidate.segment, None);
    }
}
