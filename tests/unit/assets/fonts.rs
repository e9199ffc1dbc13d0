use super::*;

#[test]
fn family_stack_is_split_and_unquoted() {
    assert_eq!(
        split_family_stack("\"DejaVu Sans\", 'Arial' ,, sans-serif"),
        vec!["DejaVu Sans", "Arial", "sans-serif"]
    );
    assert!(split_family_stack(" , ").is_empty());
}

#[test]
fn generic_names_map_to_generic_families() {
    assert_eq!(to_fontdb_family("serif"), usvg::fontdb::Family::Serif);
    assert_eq!(to_fontdb_family("monospace"), usvg::fontdb::Family::Monospace);
    assert_eq!(to_fontdb_family("Inter"), usvg::fontdb::Family::Name("Inter"));
}

#[test]
fn empty_database_cannot_describe_faces() {
    let book = FontBook::from_database(usvg::fontdb::Database::new());
    assert!(book.is_empty());
    assert_eq!(book.face_count(), 0);
    assert!(book.describe(DEFAULT_FONT_FAMILY).is_err());
}

#[test]
fn only_font_extensions_are_loaded() {
    let dir = std::path::PathBuf::from("target").join("fonts_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let txt = dir.join("readme.txt");
    std::fs::write(&txt, b"not a font").unwrap();
    assert!(!is_font_file(&txt));
    assert!(!is_font_file(&dir));

    let mut db = usvg::fontdb::Database::new();
    load_fonts_from_dir(&mut db, &dir);
    assert_eq!(db.len(), 0);
}

#[test]
fn parse_svg_without_text_needs_no_fonts() {
    let book = FontBook::from_database(usvg::fontdb::Database::new());
    let tree = book
        .parse_svg(r#"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="2"></svg>"#)
        .unwrap();
    assert_eq!(tree.size().width(), 4.0);
    assert!(book.parse_svg("<svg").is_err());
}

#[test]
fn sha256_is_lowercase_hex() {
    assert_eq!(
        sha256_hex(b"abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
    assert_eq!(sha256_hex(b"").len(), 64);
}
