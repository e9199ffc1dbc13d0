use super::*;
use crate::schema::hierarchy::{TypeWeight, mock_invoice_schema};

fn render(f: impl Fn(&mut Vec<u8>) -> io::Result<()>) -> String {
    let mut buf = Vec::new();
    f(&mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn hierarchy_report_matches_fixed_layout() {
    let schema = mock_invoice_schema();
    let text = render(|buf| write_hierarchy_report(buf, &schema));

    let expected = "\
Schema Type Hierarchy:
========================================
Root      : Customer, Invoice
Level 1   : Address, Contact, LineItem, Payment
Level 2   : Product, ShippingDetails, TaxInfo
Level 3   : Dimensions, Money, Quantity
Leaf      : Currency, Timestamp, Unit

";
    assert_eq!(text, expected);
}

#[test]
fn unknown_weights_get_generic_label() {
    let schema = SchemaMapping::new(vec![
        TypeWeight::new("Odd", 7),
        TypeWeight::new("Invoice", 10),
    ]);
    let text = render(|buf| write_hierarchy_report(buf, &schema));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[2], "Root      : Invoice");
    assert_eq!(lines[3], "Level (weight 7): Odd");
}

#[test]
fn weight_listing_is_stable_for_ties() {
    let schema = mock_invoice_schema();
    let text = render(|buf| write_weight_listing(buf, &schema));
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "Schema hierarchy by weight:");
    assert_eq!(lines.len(), 16);
    assert_eq!(lines[1], "Invoice        : 10");
    assert_eq!(lines[2], "Customer       : 10");
    assert_eq!(lines[3], "LineItem       : 8");
    assert_eq!(lines[9], "ShippingDetails: 6");
    assert_eq!(lines[15], "Timestamp      : 2");
}
