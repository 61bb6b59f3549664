use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use social_vision::{
    FusionConfig, SocialPipeline,
    pipeline::analyze_batch,
    scene::{load_scene, report_path, write_report},
};

const USAGE: &str = "usage: social-vision [--config FILE] [--output DIR] SCENE.json...";

struct CliArgs {
    config: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    scenes: Vec<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args(std::env::args().skip(1))?;
    let config = FusionConfig::load_or_default(args.config.as_deref())?;
    let pipeline = SocialPipeline::new(&config);

    let scenes = args
        .scenes
        .iter()
        .map(|path| load_scene(path))
        .collect::<Result<Vec<_>>>()?;

    println!("analyzing {} scene(s)", scenes.len());

    let reports = analyze_batch(&pipeline, scenes);
    for (path, report) in args.scenes.iter().zip(reports) {
        let report = report.with_context(|| format!("failed to analyze {}", path.display()))?;
        let out = report_path(path, args.output_dir.as_deref());
        write_report(&out, &report)?;

        println!("{} -> {}", path.display(), out.display());
        for person in &report.people {
            println!("  {}", person.display_text());
        }
    }

    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs> {
    let mut config = None;
    let mut output_dir = None;
    let mut scenes = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                config = Some(PathBuf::from(args.next().context("--config needs a file")?));
            }
            "--output" => {
                output_dir = Some(PathBuf::from(
                    args.next().context("--output needs a directory")?,
                ));
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other if other.starts_with("--") => bail!("unknown option {other}\n{USAGE}"),
            _ => scenes.push(PathBuf::from(&arg)),
        }
    }

    if scenes.is_empty() {
        bail!("no scene files given\n{USAGE}");
    }

    Ok(CliArgs {
        config,
        output_dir,
        scenes,
    })
}
