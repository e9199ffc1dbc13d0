use super::*;

#[test]
fn mock_schema_has_fifteen_entries_in_five_tiers() {
    let schema = mock_invoice_schema();
    assert_eq!(schema.len(), 15);
    assert!(schema.entries().iter().all(|e| e.tier().is_some()));
}

#[test]
fn grouping_yields_expected_sizes_heaviest_first() {
    let groups = mock_invoice_schema().grouped_by_weight();
    let shape: Vec<(u32, usize)> = groups.iter().map(|(w, n)| (*w, n.len())).collect();
    assert_eq!(shape, vec![(10, 2), (8, 4), (6, 3), (4, 3), (2, 3)]);
}

#[test]
fn names_within_group_are_sorted() {
    let groups = mock_invoice_schema().grouped_by_weight();
    assert_eq!(groups[0].1, vec!["Customer", "Invoice"]);
    assert_eq!(groups[1].1, vec!["Address", "Contact", "LineItem", "Payment"]);
    assert_eq!(groups[4].1, vec!["Currency", "Timestamp", "Unit"]);
}

#[test]
fn mapping_is_deterministic_and_preserves_insertion_order() {
    let a = mock_invoice_schema();
    let b = mock_invoice_schema();
    assert_eq!(a, b);
    assert_eq!(a.entries()[0].name, "Invoice");
    assert_eq!(a.entries()[14].name, "Timestamp");
    assert_eq!(a.weight_of("ShippingDetails"), Some(6));
    assert_eq!(a.weight_of("Nope"), None);
}

#[test]
fn tier_weight_roundtrip() {
    for tier in Tier::ALL {
        assert_eq!(Tier::from_weight(tier.weight()), Some(tier));
    }
    assert_eq!(Tier::from_weight(7), None);
    assert_eq!(Tier::Root.legend_color().to_hex(), "#2c5aa0");
    assert_eq!(Tier::Leaf.legend_label(), "Leaf Types (Level 4+)");
}

#[test]
fn frequencies_follow_insertion_order() {
    let freqs = mock_invoice_schema().frequencies();
    assert_eq!(freqs[0], ("Invoice".to_string(), 10.0));
    assert_eq!(freqs[2], ("LineItem".to_string(), 8.0));
}
