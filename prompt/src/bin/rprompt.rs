// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use std::{process::ExitCode, thread, time::Duration};

use clap::{Parser, Subcommand, ValueEnum};
use miette::IntoDiagnostic;
use r3bl_prompt::{checklist,
                  enter,
                  select,
                  try_initialize_logging,
                  validators,
                  yes_no,
                  BoundaryPolicy,
                  FloatWidth,
                  Form,
                  IntWidth,
                  ListConfig,
                  LogLevel,
                  PercentProgress,
                  ProgressBar,
                  PromptConfig,
                  PromptOutcome,
                  SelectOption,
                  StdioPromptSession,
                  TargetKind,
                  TracingConfig,
                  Validator,
                  Value};

#[derive(Debug, Parser)]
#[command(bin_name = "rprompt")]
#[command(about = "Ask questions on the command line: text, lists, checklists, progress", long_about = None)]
#[command(version)]
#[command(next_line_help = true)]
#[command(arg_required_else_help(true))]
struct CliArgs {
    #[command(subcommand)]
    command: CliCommand,

    /// Write logs to `rprompt_log.txt` at this level.
    #[arg(value_name = "level", long, global = true, default_value = "off")]
    log_level: LogLevel,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Read a line of text, coerced into a type.
    Prompt {
        label: String,
        #[arg(long, short = 'k', default_value = "text")]
        kind: KindArg,
        /// Pre-filled value.
        #[arg(long, short = 'd')]
        default: Option<String>,
        #[arg(long)]
        min_length: Option<usize>,
        #[arg(long)]
        max_length: Option<usize>,
        /// Regular expression the text must match.
        #[arg(long)]
        pattern: Option<String>,
    },
    /// Pick one of the given options.
    Select {
        label: String,
        #[arg(required = true)]
        options: Vec<String>,
        #[command(flatten)]
        list_args: ListArgs,
    },
    /// Check any number of the given options.
    Checklist {
        label: String,
        #[arg(required = true)]
        options: Vec<String>,
        /// Index of an option to check up front. Repeatable.
        #[arg(long, short = 'c')]
        checked: Vec<usize>,
        #[command(flatten)]
        list_args: ListArgs,
    },
    /// Answer with a single key.
    YesNo {
        label: String,
        #[arg(long, short = 'd')]
        default: Option<bool>,
    },
    /// Wait for enter.
    Enter { label: String },
    /// Show a progress bar that fills up over time.
    Progress {
        #[arg(default_value = "progress ")]
        label: String,
        #[arg(long, default_value_t = 100)]
        steps: u32,
        #[arg(long, default_value_t = 20)]
        step_millis: u64,
    },
    /// Run a short form that shows every kind of prompt.
    Demo,
}

#[derive(Debug, clap::Args)]
struct ListArgs {
    #[arg(long, short = 'l')]
    max_visible_lines: Option<usize>,
    #[arg(long, short = 'b', default_value = "clamp")]
    boundary: BoundaryPolicy,
}

impl ListArgs {
    fn to_list_config(&self) -> ListConfig {
        let mut config = ListConfig {
            boundary_policy: self.boundary,
            ..ListConfig::default()
        };
        if let Some(max_visible_lines) = self.max_visible_lines {
            config.max_visible_lines = max_visible_lines;
        }
        config
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Text,
    Bool,
    Int,
    Uint,
    Float,
    Timestamp,
}

impl From<KindArg> for TargetKind {
    fn from(it: KindArg) -> Self {
        match it {
            KindArg::Text => TargetKind::Text,
            KindArg::Bool => TargetKind::Bool,
            KindArg::Int => TargetKind::Int(IntWidth::W64),
            KindArg::Uint => TargetKind::UInt(IntWidth::W64),
            KindArg::Float => TargetKind::Float(FloatWidth::F64),
            KindArg::Timestamp => TargetKind::Timestamp,
        }
    }
}

fn main() -> miette::Result<ExitCode> {
    // If no args are passed, the following line will fail, and help will be printed
    // thanks to `arg_required_else_help(true)` in the `CliArgs` struct.
    let cli_args = CliArgs::parse();

    try_initialize_logging(TracingConfig::new(cli_args.log_level))?;
    tracing::debug!(message = "start", cli_args = ?cli_args);

    let is_accepted = match cli_args.command {
        CliCommand::Prompt {
            label,
            kind,
            default,
            min_length,
            max_length,
            pattern,
        } => {
            let kind = TargetKind::from(kind);
            let default = default
                .map(|it| kind.coerce(&it))
                .transpose()
                .map_err(|reason| miette::miette!("invalid --default: {reason}"))?;
            let mut validators: Vec<Validator> = vec![];
            if min_length.is_some() || max_length.is_some() {
                validators.push(validators::str_length(min_length.unwrap_or(0), max_length));
            }
            if let Some(pattern) = pattern {
                validators.push(validators::pattern(&pattern, "doesn't match the pattern"));
            }
            let config = PromptConfig {
                default,
                initial_cursor: None,
            };
            r3bl_prompt::prompt(&label, kind, &config, validators)?.is_accepted()
        }
        CliCommand::Select {
            label,
            options,
            list_args,
        } => {
            select(&label, to_options(options), 0, &list_args.to_list_config())?
                .is_accepted()
        }
        CliCommand::Checklist {
            label,
            options,
            checked,
            list_args,
        } => checklist(&label, to_options(options), &checked, &list_args.to_list_config())?
            .is_accepted(),
        CliCommand::YesNo { label, default } => yes_no(&label, default)?.is_accepted(),
        CliCommand::Enter { label } => enter(&label)?.is_accepted(),
        CliCommand::Progress {
            label,
            steps,
            step_millis,
        } => {
            run_progress(label, steps, step_millis)?;
            true
        }
        CliCommand::Demo => run_demo()?,
    };

    tracing::debug!(message = "stop", is_accepted);
    Ok(if is_accepted {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn to_options(options: Vec<String>) -> Vec<SelectOption<String>> {
    options
        .into_iter()
        .map(|it| SelectOption::new(it.clone(), it))
        .collect()
}

fn run_progress(label: String, steps: u32, step_millis: u64) -> miette::Result<()> {
    let mut progress = PercentProgress::new(ProgressBar::new_stdout(label), f64::from(steps));
    progress.start().into_diagnostic()?;
    for _ in 0..steps {
        thread::sleep(Duration::from_millis(step_millis));
        progress.add(1.0).into_diagnostic()?;
    }
    progress.stop().into_diagnostic()
}

fn run_demo() -> miette::Result<bool> {
    let mut session = StdioPromptSession::try_new_stdio()?;
    let colors = ["Red", "Orange", "Green", "Yellow", "Blue", "Purple", "Pink"]
        .into_iter()
        .map(|it| SelectOption::new(it, Value::from(it.to_lowercase())))
        .collect();

    let outcome = Form::new()
        .print("Demo", "rprompt")
        .prompt(
            "Name",
            TargetKind::Text,
            PromptConfig::default(),
            vec![validators::str_length(1, Some(40))],
        )
        .prompt(
            "Email",
            TargetKind::Text,
            PromptConfig::default(),
            vec![validators::empty_or(validators::email_address())],
        )
        .prompt(
            "Port",
            TargetKind::UInt(IntWidth::W16),
            PromptConfig {
                default: Some(Value::UInt(8080)),
                initial_cursor: None,
            },
            vec![validators::port()],
        )
        .prompt("Subscribe", TargetKind::Bool, PromptConfig::default(), vec![])
        .select("Favorite color", colors, 0, ListConfig::default())
        .run(&mut session)?;

    if let PromptOutcome::Accepted(values) = &outcome {
        for (label, value) in values.iter() {
            tracing::debug!(message = "demo answer", label, value = %value);
        }
    }
    Ok(outcome.is_accepted())
}
