use std::collections::BTreeMap;

use crate::foundation::core::Rgba8;

/// Nesting tier of a schema type. Shallower tiers carry larger weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Root,
    Level1,
    Level2,
    Level3,
    Leaf,
}

impl Tier {
    /// All tiers, shallowest first.
    pub const ALL: [Tier; 5] = [
        Tier::Root,
        Tier::Level1,
        Tier::Level2,
        Tier::Level3,
        Tier::Leaf,
    ];

    pub fn weight(self) -> u32 {
        match self {
            Tier::Root => 10,
            Tier::Level1 => 8,
            Tier::Level2 => 6,
            Tier::Level3 => 4,
            Tier::Leaf => 2,
        }
    }

    pub fn from_weight(weight: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.weight() == weight)
    }

    /// Label used by the hierarchy report.
    pub fn report_label(self) -> &'static str {
        match self {
            Tier::Root => "Root",
            Tier::Level1 => "Level 1",
            Tier::Level2 => "Level 2",
            Tier::Level3 => "Level 3",
            Tier::Leaf => "Leaf",
        }
    }

    /// Label used by the figure legend.
    pub fn legend_label(self) -> &'static str {
        match self {
            Tier::Root => "Root Types (Level 0)",
            Tier::Level1 => "Level 1",
            Tier::Level2 => "Level 2",
            Tier::Level3 => "Level 3",
            Tier::Leaf => "Leaf Types (Level 4+)",
        }
    }

    /// Swatch color shown next to the legend label.
    pub fn legend_color(self) -> Rgba8 {
        match self {
            Tier::Root => Rgba8::opaque(0x2C, 0x5A, 0xA0),
            Tier::Level1 => Rgba8::opaque(0x6B, 0x46, 0xC1),
            Tier::Level2 => Rgba8::opaque(0xC0, 0x26, 0xD3),
            Tier::Level3 => Rgba8::opaque(0xE1, 0x1D, 0x48),
            Tier::Leaf => Rgba8::opaque(0xEA, 0x58, 0x0C),
        }
    }
}

/// One schema type and the weight standing in for its nesting depth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeWeight {
    pub name: &'static str,
    pub weight: u32,
}

impl TypeWeight {
    pub const fn new(name: &'static str, weight: u32) -> Self {
        Self { name, weight }
    }

    pub fn tier(&self) -> Option<Tier> {
        Tier::from_weight(self.weight)
    }
}

/// Immutable, insertion-ordered mapping of type name to weight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaMapping {
    entries: Vec<TypeWeight>,
}

impl SchemaMapping {
    pub fn new(entries: Vec<TypeWeight>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[TypeWeight] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn weight_of(&self, name: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.weight)
    }

    /// Groups names by weight. Groups come out heaviest first and names within a group are
    /// sorted.
    pub fn grouped_by_weight(&self) -> Vec<(u32, Vec<&'static str>)> {
        let mut levels = BTreeMap::<u32, Vec<&'static str>>::new();
        for entry in &self.entries {
            levels.entry(entry.weight).or_default().push(entry.name);
        }

        levels
            .into_iter()
            .rev()
            .map(|(weight, mut names)| {
                names.sort_unstable();
                (weight, names)
            })
            .collect()
    }

    /// Frequencies in insertion order, as consumed by the word-cloud layout.
    pub fn frequencies(&self) -> Vec<(String, f64)> {
        self.entries
            .iter()
            .map(|e| (e.name.to_string(), f64::from(e.weight)))
            .collect()
    }
}

const MOCK_INVOICE_TYPES: [TypeWeight; 15] = [
    // Root: main business objects.
    TypeWeight::new("Invoice", 10),
    TypeWeight::new("Customer", 10),
    // Level 1: direct children of the roots.
    TypeWeight::new("LineItem", 8),
    TypeWeight::new("Payment", 8),
    TypeWeight::new("Address", 8),
    TypeWeight::new("Contact", 8),
    // Level 2
    TypeWeight::new("Product", 6),
    TypeWeight::new("TaxInfo", 6),
    TypeWeight::new("ShippingDetails", 6),
    // Level 3
    TypeWeight::new("Money", 4),
    TypeWeight::new("Quantity", 4),
    TypeWeight::new("Dimensions", 4),
    // Leaf types and primitives.
    TypeWeight::new("Currency", 2),
    TypeWeight::new("Unit", 2),
    TypeWeight::new("Timestamp", 2),
];

/// The fixed mock invoice schema.
pub fn mock_invoice_schema() -> SchemaMapping {
    SchemaMapping::new(MOCK_INVOICE_TYPES.to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/schema/hierarchy.rs"]
mod tests;
