use tracing::{debug, info, warn};

use crate::analyzers::{preview, TableSummary};
use crate::cli::args::{Cli, Commands, ProcessArgs};
use crate::error::{ProcessingError, Result};
use crate::models::RawRecord;
use crate::processors::{PipelineOutput, TransformPipeline};
use crate::readers::ProductionReader;
use crate::settings::PipelineConfig;
use crate::utils::progress::ProgressReporter;
use crate::writers::{ChartRenderer, CsvExporter, StagedOutput};

pub fn run(cli: Cli) -> Result<()> {
    setup_logging(&cli)?;

    let mut config = PipelineConfig::load(cli.config.as_deref())?;
    let silent = cli.quiet;

    match cli.command.unwrap_or(Commands::Process(ProcessArgs::default())) {
        Commands::Process(args) => {
            apply_overrides(&mut config, &args);
            config.check()?;
            process(&config, args.preview, silent)
        }

        Commands::Validate { input } => {
            if let Some(input) = input {
                config.input_path = input;
            }
            config.check()?;

            let raw = load_input(&config)?;
            let PipelineOutput { table, report } = TransformPipeline::new().run(&raw);
            info!(dates = table.len(), "validation complete");

            println!("{}", report.generate_summary());
            for line in report.verdict_lines() {
                println!("{}", line);
            }
            Ok(())
        }

        Commands::Info { input, json } => {
            if let Some(input) = input {
                config.input_path = input;
            }
            config.check()?;

            let raw = load_input(&config)?;
            let output = TransformPipeline::new().run(&raw);
            let summary = TableSummary::from_table(&output.table);

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", summary.detailed_summary());
            }
            Ok(())
        }
    }
}

fn apply_overrides(config: &mut PipelineConfig, args: &ProcessArgs) {
    if let Some(input) = &args.input {
        config.input_path = input.clone();
    }
    if let Some(output) = &args.output {
        config.output_path = output.clone();
    }
    if let Some(dir) = &args.charts_dir {
        config.charts.output_dir = dir.clone();
    }
    if args.no_charts {
        config.charts.enabled = false;
    }
}

fn load_input(config: &PipelineConfig) -> Result<Vec<RawRecord>> {
    let reader = ProductionReader::with_delimiter(config.input_delimiter_byte()?);
    let raw = reader.read_records(&config.input_path)?;
    info!(
        path = %config.input_path.display(),
        rows = raw.len(),
        "loaded input"
    );
    Ok(raw)
}

/// Full run. Every output is staged first and only committed once the CSV and
/// all charts are in place, so a failed run leaves no output file.
pub fn process(config: &PipelineConfig, preview_rows: usize, silent: bool) -> Result<()> {
    let progress = ProgressReporter::new_spinner("Loading production data...", silent);

    let raw = match load_input(config) {
        Ok(raw) => raw,
        Err(e) => {
            progress.finish_with_message("Loading failed");
            return Err(e);
        }
    };

    let PipelineOutput { table, report } =
        TransformPipeline::new().run_with_progress(&raw, Some(&progress));

    let renderer = ChartRenderer::new(config.charts.clone());
    let charts = if config.charts.enabled {
        progress.stage("Rendering charts...");
        renderer.render_all(&table)?
    } else {
        debug!("chart rendering disabled");
        Vec::new()
    };

    progress.stage("Exporting CSV...");
    let mut staged = StagedOutput::new();
    CsvExporter::with_delimiter(config.output_delimiter_byte()?).stage_table(
        &table,
        &config.output_path,
        &mut staged,
    )?;
    let chart_paths = renderer.stage_all(&charts, &mut staged)?;
    staged.commit()?;

    progress.finish_with_message(&format!("Processed {} dates", table.len()));

    if !silent {
        println!("\n{}", report.generate_summary());
        if preview_rows > 0 {
            println!("{}\n", preview(&table, preview_rows));
        }
        println!("Output file: {}", config.output_path.display());
        for path in &chart_paths {
            println!("Chart: {}", path.display());
        }
    }

    if table.is_empty() {
        warn!("final table is empty; only the header was written");
    }
    Ok(())
}

/// Set up structured logging on stderr. `RUST_LOG` wins over the flags.
pub fn setup_logging(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("energy_emissions={}", cli.get_log_level())));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .map_err(|e| ProcessingError::Config(format!("Failed to initialise logging: {}", e)))?;

    Ok(())
}
