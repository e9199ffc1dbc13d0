use anyhow::Context as _;
use clap::Parser;

use schema_cloud::{
    cli::{self, CommonArgs, TextEngine},
    schema::{mock_invoice_schema, write_weight_listing},
    showcase::{self, RenderContext},
};

/// Render the mock invoice schema as a single word cloud with default colors.
#[derive(Parser, Debug)]
#[command(name = "simple_schema_wordcloud", version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    cli::init_tracing(args.common.verbose);

    let schema = mock_invoice_schema();
    let mut stdout = std::io::stdout().lock();
    write_weight_listing(&mut stdout, &schema).context("write weight listing")?;
    drop(stdout);

    let engine = TextEngine::from_args(&args.common).context("select text engine")?;
    if args.common.dump_fonts {
        eprintln!("{}", engine.describe()?);
    }

    let ctx = RenderContext {
        seed: args.common.seed,
        ..RenderContext::new(engine.rasterizer())
    };
    let cloud = showcase::generate_simple_wordcloud(&schema, &ctx).context("generate word cloud")?;

    let out = args.common.out_dir.join(showcase::SIMPLE_PNG);
    cloud
        .save_png(&out, engine.rasterizer())
        .with_context(|| format!("save '{}'", out.display()))?;
    if args.common.svg {
        let svg = cli::save_svg_beside(&cloud.layout, &out)?;
        eprintln!("wrote {}", svg.display());
    }

    println!("\nWord cloud saved as '{}'", showcase::SIMPLE_PNG);
    println!("✅ Successfully generated schema word cloud!");
    Ok(())
}
