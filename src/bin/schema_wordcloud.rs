use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

use schema_cloud::{
    cli::{self, CommonArgs, TextEngine},
    schema::{mock_invoice_schema, write_hierarchy_report},
    showcase::{self, RenderContext},
};

/// Render the mock invoice schema as tier-colored word clouds.
#[derive(Parser, Debug)]
#[command(name = "schema_wordcloud", version)]
struct Cli {
    #[command(flatten)]
    common: CommonArgs,

    /// JSON object overriding word-cloud layout options.
    #[arg(long)]
    options: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    cli::init_tracing(args.common.verbose);

    println!("Schema Word Cloud Visualizer");
    println!("{}", "=".repeat(40));

    let schema = mock_invoice_schema();
    let mut stdout = std::io::stdout().lock();
    write_hierarchy_report(&mut stdout, &schema).context("write hierarchy report")?;
    drop(stdout);

    let overrides = args.options.as_deref().map(cli::read_overrides).transpose()?;
    let engine = TextEngine::from_args(&args.common).context("select text engine")?;
    if args.common.dump_fonts {
        eprintln!("{}", engine.describe()?);
    }

    let ctx = RenderContext {
        seed: args.common.seed,
        overrides: overrides.as_ref(),
        ..RenderContext::new(engine.rasterizer())
    };

    let runs = [
        (
            "Generating circular word cloud...",
            showcase::CIRCULAR_TITLE,
            true,
            showcase::CIRCULAR_PNG,
        ),
        (
            "Generating rectangular word cloud...",
            showcase::RECTANGULAR_TITLE,
            false,
            showcase::RECTANGULAR_PNG,
        ),
    ];
    for (progress, title, use_mask, file) in runs {
        println!("{progress}");
        let cloud = showcase::generate_schema_wordcloud(&schema, title, use_mask, &ctx)
            .with_context(|| format!("generate '{title}'"))?;

        let out = args.common.out_dir.join(file);
        cloud
            .save_png(&out, engine.rasterizer())
            .with_context(|| format!("save '{}'", out.display()))?;
        if args.common.svg {
            let svg = cli::save_svg_beside(&cloud.layout, &out)?;
            eprintln!("wrote {}", svg.display());
        }
    }

    println!(
        "Word clouds saved as '{}' and '{}'",
        showcase::CIRCULAR_PNG,
        showcase::RECTANGULAR_PNG
    );
    Ok(())
}
