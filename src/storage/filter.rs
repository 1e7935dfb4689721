//! Buyer list filters and pagination

use crate::models::{Buyer, BuyerStatus, City, PropertyType, Timeline};

/// Conjunctive filter over buyers
///
/// Every set field must match. `search` is a case-insensitive substring
/// match against name, phone or email; any one of them is enough.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuyerFilter {
    pub city: Option<City>,
    pub property_type: Option<PropertyType>,
    pub status: Option<BuyerStatus>,
    pub timeline: Option<Timeline>,
    pub search: Option<String>,
}

impl BuyerFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, buyer: &Buyer) -> bool {
        if self.city.is_some_and(|c| c != buyer.city) {
            return false;
        }
        if self.property_type.is_some_and(|p| p != buyer.property_type) {
            return false;
        }
        if self.status.is_some_and(|s| s != buyer.status) {
            return false;
        }
        if self.timeline.is_some_and(|t| t != buyer.timeline) {
            return false;
        }

        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                buyer.full_name.to_lowercase().contains(&term)
                    || buyer.phone.contains(&term)
                    || buyer
                        .email
                        .as_deref()
                        .is_some_and(|e| e.to_lowercase().contains(&term))
            }
        }
    }
}

/// A 1-based page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: usize,
    pub size: usize,
}

impl Page {
    /// Page `number` of `size` rows; zero is read as one for both
    pub fn new(number: usize, size: usize) -> Self {
        Self {
            number: number.max(1),
            size: size.max(1),
        }
    }

    /// Rows before this page; saturates, so a huge page number is just empty
    pub fn skip(&self) -> usize {
        (self.number - 1).saturating_mul(self.size)
    }

    /// Number of pages needed for `total` rows (at least one)
    pub fn count_for(&self, total: usize) -> usize {
        total.div_ceil(self.size).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BuyerInput, Purpose, Source};

    fn buyer(name: &str, phone: &str, email: Option<&str>, city: City) -> Buyer {
        Buyer::from_input(
            BuyerInput {
                full_name: name.into(),
                email: email.map(String::from),
                phone: phone.into(),
                city,
                property_type: PropertyType::Plot,
                bhk: None,
                purpose: Purpose::Buy,
                budget_min: None,
                budget_max: None,
                timeline: Timeline::Exploring,
                source: Source::Call,
                notes: None,
                tags: Vec::new(),
                status: None,
            },
            "u1",
        )
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = BuyerFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&buyer("Jo Lee", "9876543210", None, City::Mohali)));
    }

    #[test]
    fn test_equality_filters_are_conjunctive() {
        let filter = BuyerFilter {
            city: Some(City::Mohali),
            timeline: Some(Timeline::Exploring),
            ..Default::default()
        };
        assert!(filter.matches(&buyer("Jo Lee", "9876543210", None, City::Mohali)));
        assert!(!filter.matches(&buyer("Jo Lee", "9876543210", None, City::Panchkula)));

        let filter = BuyerFilter {
            status: Some(BuyerStatus::Converted),
            ..Default::default()
        };
        assert!(!filter.matches(&buyer("Jo Lee", "9876543210", None, City::Mohali)));
    }

    #[test]
    fn test_search_is_disjunctive_and_case_insensitive() {
        let b = buyer("Jo Lee", "9876543210", Some("Jo@Example.com"), City::Mohali);
        let by = |term: &str| BuyerFilter {
            search: Some(term.into()),
            ..Default::default()
        };

        assert!(by("jo l").matches(&b));
        assert!(by("65432").matches(&b));
        assert!(by("example.COM").matches(&b));
        assert!(!by("nobody").matches(&b));
        assert!(by("  ").matches(&b));
    }

    #[test]
    fn test_page_math() {
        let page = Page::new(0, 10);
        assert_eq!(page.number, 1);
        assert_eq!(page.skip(), 0);
        assert_eq!(Page::new(3, 10).skip(), 20);
        assert_eq!(page.count_for(0), 1);
        assert_eq!(page.count_for(10), 1);
        assert_eq!(page.count_for(11), 2);
    }

    #[test]
    fn test_huge_page_number_saturates() {
        let page = Page::new(usize::MAX, 10);
        assert_eq!(page.skip(), usize::MAX);
        assert_eq!(page.count_for(3), 1);
    }
}
