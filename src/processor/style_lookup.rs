use std::collections::HashMap;
use std::sync::LazyLock;

/// Modeled property categories. `Excluded` covers the plexes, co-ops,
/// houseboats and manufactured stock whose price dynamics are too distinct
/// to pool with single-family, condo, and townhouse sales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyType {
    House,
    Condo,
    Townhouse,
    Excluded,
}

impl PropertyType {
    /// Column label used in the dataset. `Excluded` maps to the empty label,
    /// so drop-first one-hot encoding leaves excluded rows all-zero.
    pub fn label(self) -> &'static str {
        match self {
            PropertyType::House => "house",
            PropertyType::Condo => "condo",
            PropertyType::Townhouse => "townhouse",
            PropertyType::Excluded => "",
        }
    }
}

use PropertyType::{Condo, Excluded, House, Townhouse};

/// Hand-curated mapping from the listing site's free-text style descriptor
/// to (property type, basement flag). Exact match only; a new market means
/// enumerating that market's descriptor strings and extending this table.
const STYLE_TABLE: &[(&str, PropertyType, bool)] = &[
    ("", Excluded, false),
    ("1 1/2 Story", House, false),
    ("1 1/2 Story with Basement", House, true),
    ("1 1/2 Story with Basement, Cape Cod", House, true),
    ("1 1/2 Story with Basement, Colonial", House, true),
    ("1 1/2 Story with Basement, Contemporary", House, true),
    ("1 1/2 Story with Basement, Craftsman", House, true),
    ("1 1/2 Story with Basement, Modern", House, true),
    ("1 1/2 Story with Basement, Northwestern Contemporary", House, true),
    ("1 1/2 Story with Basement, Traditional", House, true),
    ("1 1/2 Story with Basement, Tudor", House, true),
    ("1 1/2 Story, Cape Cod", House, false),
    ("1 1/2 Story, Contemporary", House, false),
    ("1 1/2 Story, Craftsman", House, false),
    ("1 1/2 Story, Northwestern Contemporary", House, false),
    ("1 1/2 Story, Other (See Remarks)", House, false),
    ("1 1/2 Story, Traditional", House, false),
    ("1 1/2 Story, Tudor", House, false),
    ("1 Story", House, false),
    ("1 Story with Basement", House, true),
    ("1 Story with Basement, Cape Cod", House, true),
    ("1 Story with Basement, Contemporary", House, true),
    ("1 Story with Basement, Craftsman", House, true),
    ("1 Story with Basement, Modern", House, true),
    ("1 Story with Basement, Northwestern Contemporary", House, true),
    ("1 Story with Basement, Other (See Remarks)", House, true),
    ("1 Story with Basement, Spanish/Southwestern", House, true),
    ("1 Story with Basement, Traditional", House, true),
    ("1 Story with Basement, Tudor", House, true),
    ("1 Story, Cabin", House, false),
    ("1 Story, Cape Cod", House, false),
    ("1 Story, Contemporary", House, false),
    ("1 Story, Craftsman", House, false),
    ("1 Story, Modern", House, false),
    ("1 Story, Northwestern Contemporary", House, false),
    ("1 Story, Other (See Remarks)", House, false),
    ("1 Story, Traditional", House, false),
    ("2 Stories with Basement", House, true),
    ("2 Stories with Basement, Cape Cod", House, true),
    ("2 Stories with Basement, Colonial", House, true),
    ("2 Stories with Basement, Contemporary", House, true),
    ("2 Stories with Basement, Craftsman", House, true),
    ("2 Stories with Basement, Modern", House, true),
    ("2 Stories with Basement, Northwestern Contemporary", House, true),
    ("2 Stories with Basement, Other (See Remarks)", House, true),
    ("2 Stories with Basement, Traditional", House, true),
    ("2 Stories with Basement, Tudor", House, true),
    ("2 Stories with Basement, Victorian", House, true),
    ("2 Story", House, false),
    ("2 Story, Cape Cod", House, false),
    ("2 Story, Contemporary", House, false),
    ("2 Story, Craftsman", House, false),
    ("2 Story, Modern", House, false),
    ("2 Story, Northwestern Contemporary", House, false),
    ("2 Story, Other (See Remarks)", House, false),
    ("2 Story, Spanish/Southwestern", House, false),
    ("2 Story, Traditional", House, false),
    ("4-Plex", Excluded, false),
    ("5-9 Units", Excluded, false),
    ("Co-op", Excluded, false),
    ("Condominium (2 Levels)", Condo, false),
    ("Condominium (2 Levels), Contemporary", Condo, false),
    ("Condominium (2 Levels), Loft", Condo, false),
    ("Condominium (2 Levels), Modern", Condo, false),
    ("Condominium (2 Levels), Townhouse", Condo, false),
    ("Condominium (2 Levels), Traditional", Condo, false),
    ("Condominium (3+ Levels)", Condo, false),
    ("Condominium (3+ Levels), Contemporary", Condo, false),
    ("Condominium (3+ Levels), Modern", Condo, false),
    ("Condominium (3+ Levels), Townhouse", Condo, false),
    ("Condominium (Single Level)", Condo, false),
    ("Condominium (Single Level), Contemporary", Condo, false),
    ("Condominium (Single Level), Craftsman", Condo, false),
    ("Condominium (Single Level), Loft", Condo, false),
    ("Condominium (Single Level), Modern", Condo, false),
    ("Condominium (Single Level), Other (See Remarks)", Condo, false),
    ("Condominium (Single Level), Spanish/Southwestern", Condo, false),
    ("Condominium (Single Level), Studio", Condo, false),
    ("Condominium (Single Level), Traditional", Condo, false),
    ("Condominium (Single Level), Tudor", Condo, false),
    ("Duplex", Excluded, false),
    ("Houseboat, Cabin", Excluded, false),
    ("Houseboat, Contemporary", Excluded, false),
    ("Manufactured Double-Wide", Excluded, false),
    ("Multi-Family", Excluded, false),
    ("Multi-Level", House, false),
    ("Multi-Level, Contemporary", House, false),
    ("Multi-Level, Craftsman", House, false),
    ("Multi-Level, Modern", House, false),
    ("Multi-Level, Northwestern Contemporary", House, false),
    ("Multi-Level, Other (See Remarks)", House, false),
    ("Multi-Level, Traditional", House, false),
    ("Multi-Level, Tudor", House, false),
    ("Multi-Level, Victorian", House, false),
    ("Residential (1+ Acre)", House, false),
    ("Residential (<1 Acre)", House, false),
    ("Single Family Residential", House, false),
    ("Split-Entry", House, false),
    ("Split-Entry, Contemporary", House, false),
    ("Split-Entry, Craftsman", House, false),
    ("Split-Entry, Modern", House, false),
    ("Split-Entry, Northwestern Contemporary", House, false),
    ("Split-Entry, Other (See Remarks)", House, false),
    ("Split-Entry, Traditional", House, false),
    ("Townhouse", Townhouse, false),
    ("Townhouse, Contemporary", Townhouse, false),
    ("Townhouse, Craftsman", Townhouse, false),
    ("Townhouse, Modern", Townhouse, false),
    ("Townhouse, Northwestern Contemporary", Townhouse, false),
    ("Townhouse, Townhouse", Townhouse, false),
    ("Townhouse, Traditional", Townhouse, false),
    ("Tri-Level", House, false),
    ("Tri-Level, Cape Cod", House, false),
    ("Tri-Level, Contemporary", House, false),
    ("Tri-Level, Craftsman", House, false),
    ("Tri-Level, Modern", House, false),
    ("Tri-Level, Northwestern Contemporary", House, false),
    ("Tri-Level, Other (See Remarks)", House, false),
    ("Tri-Level, Traditional", House, false),
    ("Triplex", Excluded, false),
];

static STYLE_INDEX: LazyLock<HashMap<&'static str, (PropertyType, bool)>> = LazyLock::new(|| {
    STYLE_TABLE
        .iter()
        .map(|&(descriptor, kind, basement)| (descriptor, (kind, basement)))
        .collect()
});

/// Classify a free-text style descriptor. Descriptors not in the table
/// (including the empty string) classify as `Excluded`.
pub fn classify_type(descriptor: &str) -> PropertyType {
    STYLE_INDEX
        .get(descriptor)
        .map(|&(kind, _)| kind)
        .unwrap_or(Excluded)
}

/// Whether the descriptor denotes a basement variant. Unknown descriptors
/// resolve to false.
pub fn has_basement(descriptor: &str) -> bool {
    STYLE_INDEX
        .get(descriptor)
        .map(|&(_, basement)| basement)
        .unwrap_or(false)
}
