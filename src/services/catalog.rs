//! Shed catalog filtering
//!
//! The public catalog narrows the active listings by four facets. A facet
//! matches when the listing's attribute contains the selected value,
//! ignoring case; empty facets match everything.

use serde::{Deserialize, Serialize};

use crate::models::ShedListing;

/// A filterable listing attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    MaterialType,
    Color,
    Size,
    ShedStyle,
}

impl Facet {
    pub const ALL: [Facet; 4] = [Facet::MaterialType, Facet::Color, Facet::Size, Facet::ShedStyle];

    fn value_of<'a>(&self, shed: &'a ShedListing) -> &'a str {
        match self {
            Facet::MaterialType => &shed.material_type,
            Facet::Color => &shed.color,
            Facet::Size => &shed.size,
            Facet::ShedStyle => &shed.shed_style,
        }
    }
}

/// Selected facet values; doubles as the catalog query string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShedFilter {
    pub material_type: String,
    pub color: String,
    pub size: String,
    pub shed_style: String,
}

impl ShedFilter {
    pub fn get(&self, facet: Facet) -> &str {
        match facet {
            Facet::MaterialType => &self.material_type,
            Facet::Color => &self.color,
            Facet::Size => &self.size,
            Facet::ShedStyle => &self.shed_style,
        }
    }

    fn slot(&mut self, facet: Facet) -> &mut String {
        match facet {
            Facet::MaterialType => &mut self.material_type,
            Facet::Color => &mut self.color,
            Facet::Size => &mut self.size,
            Facet::ShedStyle => &mut self.shed_style,
        }
    }

    /// Select `value`, or deselect it when it is already selected
    pub fn toggle(&mut self, facet: Facet, value: &str) {
        let slot = self.slot(facet);
        if slot == value {
            slot.clear();
        } else {
            *slot = value.to_string();
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        Facet::ALL.iter().all(|f| self.get(*f).is_empty())
    }

    pub fn matches(&self, shed: &ShedListing) -> bool {
        Facet::ALL.iter().all(|facet| {
            let wanted = self.get(*facet);
            wanted.is_empty()
                || facet
                    .value_of(shed)
                    .to_lowercase()
                    .contains(&wanted.to_lowercase())
        })
    }

    /// Keep the listings matching every selected facet, preserving order
    pub fn apply(&self, sheds: &[ShedListing]) -> Vec<ShedListing> {
        sheds.iter().filter(|s| self.matches(s)).cloned().collect()
    }
}

/// Selectable options per facet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetValues {
    pub material_type: Vec<String>,
    pub color: Vec<String>,
    pub size: Vec<String>,
    pub shed_style: Vec<String>,
}

/// Distinct non-empty values of each facet, in first-seen order
pub fn facet_values(sheds: &[ShedListing]) -> FacetValues {
    let distinct = |facet: Facet| {
        let mut values: Vec<String> = Vec::new();
        for shed in sheds {
            let value = facet.value_of(shed);
            if !value.is_empty() && !values.iter().any(|v| v == value) {
                values.push(value.to_string());
            }
        }
        values
    };

    FacetValues {
        material_type: distinct(Facet::MaterialType),
        color: distinct(Facet::Color),
        size: distinct(Facet::Size),
        shed_style: distinct(Facet::ShedStyle),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShedSpecifications;
    use chrono::Utc;

    fn shed(id: i64, material: &str, color: &str, size: &str, style: &str) -> ShedListing {
        ShedListing {
            id,
            title: format!("Shed {}", id),
            description: String::new(),
            material_type: material.to_string(),
            color: color.to_string(),
            size: size.to_string(),
            shed_style: style.to_string(),
            price: None,
            images: Vec::new(),
            specifications: ShedSpecifications::default(),
            is_featured: false,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn inventory() -> Vec<ShedListing> {
        vec![
            shed(1, "Wood", "Barn Red", "10x12", "Gable"),
            shed(2, "Metal", "Gray", "8x10", "Lean-To"),
            shed(3, "Wood", "Gray", "10x12", "Barn"),
            shed(4, "Vinyl", "White", "12x16", "Gable"),
        ]
    }

    #[test]
    fn test_empty_filter_returns_all_in_order() {
        let sheds = inventory();
        let ids: Vec<_> = ShedFilter::default().apply(&sheds).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_all_selected_facets_must_match() {
        let filter = ShedFilter {
            material_type: "wood".to_string(),
            color: "GRAY".to_string(),
            ..ShedFilter::default()
        };
        let ids: Vec<_> = filter.apply(&inventory()).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_match_is_substring() {
        let filter = ShedFilter {
            color: "red".to_string(),
            ..ShedFilter::default()
        };
        let ids: Vec<_> = filter.apply(&inventory()).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_toggle_and_clear() {
        let mut filter = ShedFilter::default();
        filter.toggle(Facet::Size, "10x12");
        assert_eq!(filter.size, "10x12");

        filter.toggle(Facet::Size, "8x10");
        assert_eq!(filter.size, "8x10");

        filter.toggle(Facet::Size, "8x10");
        assert!(filter.is_empty());

        filter.toggle(Facet::Color, "Gray");
        filter.toggle(Facet::ShedStyle, "Barn");
        filter.clear();
        assert_eq!(filter, ShedFilter::default());
    }

    #[test]
    fn test_facet_values_first_seen_distinct() {
        let mut sheds = inventory();
        sheds.push(shed(5, "", "Gray", "8x10", "Gable"));
        let values = facet_values(&sheds);

        assert_eq!(values.material_type, vec!["Wood", "Metal", "Vinyl"]);
        assert_eq!(values.color, vec!["Barn Red", "Gray", "White"]);
        assert_eq!(values.size, vec!["10x12", "8x10", "12x16"]);
        assert_eq!(values.shed_style, vec!["Gable", "Lean-To", "Barn"]);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_shed() -> impl Strategy<Value = ShedListing> {
            (
                1i64..1000,
                prop::sample::select(vec!["Wood", "Metal", "Vinyl"]),
                prop::sample::select(vec!["Red", "Gray", "White", "Barn Red"]),
                prop::sample::select(vec!["8x10", "10x12", "12x16"]),
                prop::sample::select(vec!["Gable", "Barn", "Lean-To"]),
            )
                .prop_map(|(id, m, c, s, st)| shed(id, m, c, s, st))
        }

        fn arb_filter() -> impl Strategy<Value = ShedFilter> {
            let pick = |opts: Vec<&'static str>| {
                prop::sample::select(opts).prop_map(|s| s.to_string())
            };
            (
                pick(vec!["", "wood", "Metal"]),
                pick(vec!["", "red", "Gray"]),
                pick(vec!["", "10x12"]),
                pick(vec!["", "gable", "Barn"]),
            )
                .prop_map(|(material_type, color, size, shed_style)| ShedFilter {
                    material_type,
                    color,
                    size,
                    shed_style,
                })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(20))]

            /// Filtering keeps exactly the matching rows, in input order
            #[test]
            fn property_filter_is_exact_subsequence(
                sheds in prop::collection::vec(arb_shed(), 0..20),
                filter in arb_filter()
            ) {
                let kept = filter.apply(&sheds);
                let expected: Vec<i64> = sheds.iter().filter(|s| filter.matches(s)).map(|s| s.id).collect();
                let actual: Vec<i64> = kept.iter().map(|s| s.id).collect();
                prop_assert_eq!(actual, expected);

                for s in &kept {
                    for facet in Facet::ALL {
                        let wanted = filter.get(facet).to_lowercase();
                        prop_assert!(facet.value_of(s).to_lowercase().contains(&wanted));
                    }
                }
            }

            /// Toggling a value twice either restores it or clears the facet
            #[test]
            fn property_double_toggle(
                filter in arb_filter(),
                value in "[a-z]{1,6}"
            ) {
                let mut toggled = filter.clone();
                toggled.toggle(Facet::Color, &value);
                toggled.toggle(Facet::Color, &value);
                if filter.color == value {
                    prop_assert_eq!(toggled, filter);
                } else {
                    prop_assert!(toggled.color.is_empty());
                    prop_assert_eq!(toggled.size, filter.size);
                }
            }
        }
    }
}
