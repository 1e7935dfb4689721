//! Closed value sets for buyer fields
//!
//! Each set serializes to the exact label shown to users ("Walk-in", ">6m",
//! "Studio"), which is also the only spelling validation accepts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate a closed set of string labels
macro_rules! define_choices {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted value, in display order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Exact match against the canonical label
            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($label => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Case-insensitive match, used for CLI filters
            pub fn parse_loose(s: &str) -> Option<Self> {
                let s = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
            }

            /// Comma-separated list of labels for error messages
            pub fn expected() -> String {
                Self::ALL
                    .iter()
                    .map(|v| v.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

define_choices!(
    /// City the buyer wants to purchase or rent in
    City {
        Chandigarh => "Chandigarh",
        Mohali => "Mohali",
        Zirakpur => "Zirakpur",
        Panchkula => "Panchkula",
        Other => "Other",
    }
);

define_choices!(
    PropertyType {
        Apartment => "Apartment",
        Villa => "Villa",
        Plot => "Plot",
        Office => "Office",
        Retail => "Retail",
    }
);

define_choices!(
    /// Bedroom count; only meaningful for residential property types
    Bhk {
        Studio => "Studio",
        One => "1",
        Two => "2",
        Three => "3",
        Four => "4",
    }
);

define_choices!(
    Purpose {
        Buy => "Buy",
        Rent => "Rent",
    }
);

define_choices!(
    /// How soon the buyer expects to close
    Timeline {
        ZeroToThreeMonths => "0-3m",
        ThreeToSixMonths => "3-6m",
        MoreThanSixMonths => ">6m",
        Exploring => "Exploring",
    }
);

define_choices!(
    /// Where the lead came from
    Source {
        Website => "Website",
        Referral => "Referral",
        WalkIn => "Walk-in",
        Call => "Call",
        Other => "Other",
    }
);

define_choices!(
    /// Sales pipeline stage of a lead
    BuyerStatus {
        New => "New",
        Qualified => "Qualified",
        Contacted => "Contacted",
        Visited => "Visited",
        Negotiation => "Negotiation",
        Converted => "Converted",
        Dropped => "Dropped",
    }
);

impl PropertyType {
    /// Residential types carry a BHK value
    pub fn requires_bhk(&self) -> bool {
        matches!(self, Self::Apartment | Self::Villa)
    }
}

impl Default for BuyerStatus {
    fn default() -> Self {
        Self::New
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip_through_serde() {
        let json = serde_json::to_string(&Timeline::MoreThanSixMonths).unwrap();
        assert_eq!(json, "\">6m\"");
        let back: Timeline = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Timeline::MoreThanSixMonths);

        let json = serde_json::to_string(&Source::WalkIn).unwrap();
        assert_eq!(json, "\"Walk-in\"");
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(City::parse("Mohali"), Some(City::Mohali));
        assert_eq!(City::parse("mohali"), None);
        assert_eq!(Bhk::parse("2"), Some(Bhk::Two));
        assert_eq!(Bhk::parse("5"), None);
    }

    #[test]
    fn test_parse_loose_ignores_case() {
        assert_eq!(City::parse_loose(" mohali "), Some(City::Mohali));
        assert_eq!(Source::parse_loose("WALK-IN"), Some(Source::WalkIn));
        assert_eq!(BuyerStatus::parse_loose("unknown"), None);
    }

    #[test]
    fn test_requires_bhk() {
        assert!(PropertyType::Apartment.requires_bhk());
        assert!(PropertyType::Villa.requires_bhk());
        assert!(!PropertyType::Plot.requires_bhk());
        assert!(!PropertyType::Office.requires_bhk());
        assert!(!PropertyType::Retail.requires_bhk());
    }

    #[test]
    fn test_expected_lists_all_values() {
        assert_eq!(Purpose::expected(), "Buy, Rent");
        assert_eq!(BuyerStatus::default(), BuyerStatus::New);
    }
}
