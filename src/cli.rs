use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "fmriprep-autoqc",
    version,
    about = "Automated quality control for fMRIPrep derivatives"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute QC metrics and pass/fail decisions
    Run(RunArgs),
    /// Check that the derivative dataset has the files a run needs
    Validate(ValidateArgs),
    /// Print the template brain mask the run would use
    Template(TemplateArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[arg(long, help = "fMRIPrep derivative directory")]
    pub input: PathBuf,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, value_enum, default_value_t = AnalysisLevelArg::Group)]
    pub analysis_level: AnalysisLevelArg,

    #[arg(
        long,
        num_args = 1..,
        help = "Subject labels with or without 'sub-' (default: all)"
    )]
    pub participant_label: Vec<String>,

    #[arg(long, num_args = 1.., help = "Task names (default: all)")]
    pub task: Vec<String>,

    #[arg(long, env = "TEMPLATEFLOW_HOME")]
    pub templateflow_home: Option<PathBuf>,

    #[arg(
        long,
        default_value_t = false,
        help = "Keep only the largest connected component of the group mask"
    )]
    pub connected_group_mask: bool,

    #[arg(long, default_value_t = false, help = "Write the group functional mask")]
    pub save_group_mask: bool,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = 0, help = "Number of threads (0 = auto)")]
    pub threads: usize,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long, help = "fMRIPrep derivative directory")]
    pub input: PathBuf,

    #[arg(long, num_args = 1..)]
    pub participant_label: Vec<String>,

    #[arg(long, num_args = 1..)]
    pub task: Vec<String>,
}

#[derive(Debug, Args)]
pub struct TemplateArgs {
    #[arg(long, env = "TEMPLATEFLOW_HOME")]
    pub templateflow_home: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AnalysisLevelArg {
    Participant,
    Group,
}
