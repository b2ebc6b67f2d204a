//! Fixed categorical vocabularies
//!
//! The single source of allowed values for every categorical input. Both the
//! input validator (domain checks) and the encoder (integer codes) read from
//! here, so the two can never disagree about what is accepted.

use serde::Serialize;
use std::fmt;

/// Item fat content, as offered on the form
pub const ITEM_FAT_CONTENT: &[&str] = &["Low Fat", "Regular"];

/// Item categories, as offered on the form
pub const ITEM_TYPES: &[&str] = &[
    "Dairy",
    "Soft Drinks",
    "Meat",
    "Fruits and Vegetables",
    "Household",
    "Baking Goods",
    "Snack Foods",
    "Frozen Foods",
    "Breakfast",
    "Canned",
    "Deli",
    "Breads",
    "Hard Drinks",
    "Starchy Foods",
    "Seafood",
    "Others",
];

/// Outlet sizes, as offered on the form
pub const OUTLET_SIZES: &[&str] = &["Small", "Medium", "High"];

/// Outlet location tiers, as offered on the form
pub const OUTLET_LOCATION_TYPES: &[&str] = &["Tier 1", "Tier 2", "Tier 3"];

/// Outlet types, as offered on the form
pub const OUTLET_TYPES: &[&str] = &[
    "Grocery Store",
    "Supermarket Type1",
    "Supermarket Type2",
    "Supermarket Type3",
];

/// A categorical model input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CategoricalFeature {
    ItemFatContent,
    ItemType,
    OutletSize,
    OutletLocationType,
    OutletType,
}

impl CategoricalFeature {
    /// All categorical features, in feature-vector order
    pub const ALL: [CategoricalFeature; 5] = [
        CategoricalFeature::ItemFatContent,
        CategoricalFeature::ItemType,
        CategoricalFeature::OutletSize,
        CategoricalFeature::OutletLocationType,
        CategoricalFeature::OutletType,
    ];

    /// Training-time column name
    pub fn name(self) -> &'static str {
        match self {
            CategoricalFeature::ItemFatContent => "Item_Fat_Content",
            CategoricalFeature::ItemType => "Item_Type",
            CategoricalFeature::OutletSize => "Outlet_Size",
            CategoricalFeature::OutletLocationType => "Outlet_Location_Type",
            CategoricalFeature::OutletType => "Outlet_Type",
        }
    }

    /// Allowed values in display order
    pub fn values(self) -> &'static [&'static str] {
        match self {
            CategoricalFeature::ItemFatContent => ITEM_FAT_CONTENT,
            CategoricalFeature::ItemType => ITEM_TYPES,
            CategoricalFeature::OutletSize => OUTLET_SIZES,
            CategoricalFeature::OutletLocationType => OUTLET_LOCATION_TYPES,
            CategoricalFeature::OutletType => OUTLET_TYPES,
        }
    }

    /// Whether `value` belongs to this feature's vocabulary
    pub fn contains(self, value: &str) -> bool {
        self.values().contains(&value)
    }

    /// Look a feature up by its column name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|feature| feature.name() == name)
    }
}

impl fmt::Display for CategoricalFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
