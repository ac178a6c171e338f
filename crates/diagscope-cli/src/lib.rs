//! CLI logic for the Diagscope tool.
//!
//! This module dispatches the parsed subcommand to the `diagscope` library
//! and writes the result to the given output.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Command, DiffArgs, RunArgs, ViewArgs};

use std::io::{self, Write};

use log::info;

use diagscope::{
    CatalogBuilder, DiagscopeError,
    config::{AppConfig, GroupLabel, PipelineConfig, ViewConfig},
    diff,
    pipeline::ReleasePipeline,
};

/// Run the Diagscope CLI application, writing to stdout.
///
/// # Errors
///
/// Returns `DiagscopeError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed dumps
/// - Dangling group references and subgroup cycles
pub fn run(args: &Args) -> Result<(), DiagscopeError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    run_with_output(args, &mut out)
}

/// Run the Diagscope CLI application, writing to `out`.
///
/// # Errors
///
/// Same as [`run`], plus failures writing to `out`.
pub fn run_with_output(args: &Args, out: &mut impl Write) -> Result<(), DiagscopeError> {
    let app_config = config::load_config(args.config.as_ref())?;

    match &args.command {
        Command::View(view) => run_view(view, &app_config, out),
        Command::Diff(diff) => run_diff(diff, out),
        Command::Run(run) => run_pipeline(run, &app_config, out),
    }
}

fn run_view(
    args: &ViewArgs,
    app_config: &AppConfig,
    out: &mut impl Write,
) -> Result<(), DiagscopeError> {
    let kind = args.kind();
    info!(input_path = args.input.display().to_string(), view:% = kind; "Rendering view");

    let configured = app_config.view();
    let label = if args.switch_names {
        GroupLabel::Switch
    } else {
        configured.label()
    };
    let view_config = ViewConfig::new(
        label,
        args.annotate || configured.annotate(),
        args.closures || configured.closures(),
    )
    .with_default_section(args.default_section || configured.default_section());

    let builder = CatalogBuilder::new(AppConfig::new(view_config, app_config.pipeline().clone()));
    let graph = builder.build_file(&args.input)?;
    out.write_all(builder.render(&graph, kind).as_bytes())?;

    Ok(())
}

fn run_diff(args: &DiffArgs, out: &mut impl Write) -> Result<(), DiagscopeError> {
    info!(
        old_path = args.old.display().to_string(),
        new_path = args.new.display().to_string();
        "Comparing views"
    );

    let diff = diff::diff_files(&args.old, &args.new)?;
    out.write_all(diff.render().as_bytes())?;

    Ok(())
}

fn run_pipeline(
    args: &RunArgs,
    app_config: &AppConfig,
    out: &mut impl Write,
) -> Result<(), DiagscopeError> {
    let configured = app_config.pipeline();
    let pipeline_config = PipelineConfig::new(
        args.versions
            .clone()
            .unwrap_or_else(|| configured.versions().to_vec()),
        args.input_dir
            .clone()
            .unwrap_or_else(|| configured.input_dir().to_path_buf()),
        args.output_dir
            .clone()
            .unwrap_or_else(|| configured.output_dir().to_path_buf()),
        args.prefix
            .clone()
            .unwrap_or_else(|| configured.prefix().to_string()),
    );
    config::validate_pipeline(&pipeline_config)?;

    let pipeline = ReleasePipeline::new(AppConfig::new(app_config.view().clone(), pipeline_config));
    let report = pipeline.run()?;

    for path in report.view_files().iter().chain(report.diff_files()) {
        writeln!(out, "{}", path.display())?;
    }

    info!(
        releases = report.releases().len(),
        diffs = report.diff_files().len();
        "Pipeline completed"
    );

    Ok(())
}
