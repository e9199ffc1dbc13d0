use super::*;
use clap::Parser;

#[derive(Parser, Debug)]
struct TestCli {
    #[command(flatten)]
    common: CommonArgs,
}

fn parse(args: &[&str]) -> CommonArgs {
    TestCli::parse_from(std::iter::once("test").chain(args.iter().copied())).common
}

#[test]
fn empty_font_book_is_an_error() {
    let fonts = FontBook::from_database(usvg::fontdb::Database::new());
    let res = TextEngine::from_fonts(fonts);
    assert!(matches!(res, Err(CloudError::Render(msg)) if msg.contains("--block-text")));
}

#[test]
fn block_text_flag_needs_no_fonts() {
    let args = parse(&["--block-text"]);
    let engine = TextEngine::from_args(&args).unwrap();
    assert!(engine.fonts.is_none());
    assert_eq!(engine.rasterizer().font_family(), "monospace");
    assert_eq!(engine.describe().unwrap(), "font: none (block glyphs)");
}

#[test]
fn empty_font_dir_without_system_fonts_fails() {
    if !FontBook::system().is_empty() {
        eprintln!("skipping: system fonts are installed");
        return;
    }
    let dir = std::path::PathBuf::from("target").join("cli_unit_empty_fonts");
    std::fs::create_dir_all(&dir).unwrap();
    let dir_arg = dir.to_string_lossy().to_string();

    let args = parse(&["--font-dir", dir_arg.as_str()]);
    assert!(TextEngine::from_args(&args).is_err());
}

#[test]
fn common_flags_parse() {
    let args = parse(&["--out-dir", "out", "--seed", "7", "--svg", "-vv"]);
    assert_eq!(args.out_dir, std::path::PathBuf::from("out"));
    assert_eq!(args.seed, Some(7));
    assert!(args.svg);
    assert!(!args.block_text);
    assert_eq!(args.verbose, 2);
}
