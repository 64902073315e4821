use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use fmriprep_autoqc::cli::{AnalysisLevelArg, Cli, Commands, ValidateArgs};
use fmriprep_autoqc::ctx::Ctx;
use fmriprep_autoqc::io;
use fmriprep_autoqc::metrics::AnalysisLevel;
use fmriprep_autoqc::pipeline::Pipeline;
use fmriprep_autoqc::pipeline::stage1_dataset::Stage1Dataset;
use fmriprep_autoqc::template::TemplateFlowDir;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let level = match args.analysis_level {
                AnalysisLevelArg::Participant => AnalysisLevel::Participant,
                AnalysisLevelArg::Group => AnalysisLevel::Group,
            };
            let templateflow_home = args
                .templateflow_home
                .unwrap_or_else(TemplateFlowDir::default_home);

            let mut ctx = Ctx::new(
                args.input,
                args.out,
                level,
                args.participant_label,
                args.task,
                templateflow_home,
            );
            ctx.group_mask.connected = args.connected_group_mask;
            ctx.save_group_mask = args.save_group_mask;
            ctx.write_json = args.json;
            ctx.threads = args.threads;

            Pipeline::standard().run(&mut ctx)?;
            print_summary(&ctx)?;
        }
        Commands::Validate(args) => {
            handle_validate(args)?;
        }
        Commands::Template(args) => {
            let home = args
                .templateflow_home
                .unwrap_or_else(TemplateFlowDir::default_home);
            let path = TemplateFlowDir::new(home).brain_mask()?;
            println!("{}", path.display());
        }
    }

    Ok(())
}

fn print_summary(ctx: &Ctx) -> Result<()> {
    let summary = io::summary::format_summary(ctx)?;
    print!("{}", summary);
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
    Ok(())
}

fn handle_validate(args: ValidateArgs) -> Result<()> {
    let mut ctx = Ctx::new(
        args.input,
        PathBuf::from("."),
        AnalysisLevel::Participant,
        args.participant_label,
        args.task,
        TemplateFlowDir::default_home(),
    );
    Pipeline::new(vec![Box::new(Stage1Dataset::new())]).run(&mut ctx)?;

    let inv = io::summary::inventory(ctx.layout()?, &ctx.subjects, &ctx.tasks)?;
    for line in &inv.lines {
        println!("{}", line);
    }
    let warnings = ctx.warnings.iter().chain(&inv.warnings).collect::<Vec<_>>();
    if !warnings.is_empty() {
        println!("warnings:");
        for warning in warnings {
            println!("- {}", warning);
        }
    }
    if !inv.problems.is_empty() {
        for problem in &inv.problems {
            println!("error: {}", problem);
        }
        anyhow::bail!("{} problem(s) found in {}", inv.problems.len(), ctx.derivatives.display());
    }
    println!("fmriprep-autoqc validate ok");
    Ok(())
}
