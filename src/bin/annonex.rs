use annonex::{
    about,
    config::{FailurePolicy, PipelineConfig},
    gene_catalog::GeneCatalog,
    metadata::MetadataTable,
    nexus::Alignment,
    record::{Record, write_genbank_records},
    RecordOutcome, RecordPipeline,
};
use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};
use std::{
    fs::{self, File},
    io::BufWriter,
};

#[derive(Parser, Debug)]
#[command(
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,
)]
struct Cli {
    #[arg(short = 'n', long, required_unless_present = "build_info", help = "Path to the NEXUS alignment")]
    nexus: Option<String>,

    #[arg(short = 'c', long, required_unless_present = "build_info", help = "Path to the metadata CSV file")]
    csv: Option<String>,

    #[arg(short = 'o', long, required_unless_present = "build_info", help = "Path of the output file")]
    output: Option<String>,

    #[arg(short = 'd', long, help = "Description prefixed to every definition line")]
    description: Option<String>,

    #[arg(long, help = "JSON configuration file; command line flags take precedence")]
    config: Option<String>,

    #[arg(short = 't', long = "transl-table", help = "NCBI translation table id")]
    transl_table: Option<String>,

    #[arg(long = "uniq-col", help = "Metadata column holding the sequence names")]
    uniq_col: Option<String>,

    #[arg(long = "fail-fast", help = "Abort at the first sequence that cannot be converted")]
    fail_fast: bool,

    #[arg(long, help = "Process sequences in parallel")]
    parallel: bool,

    #[arg(long = "checklist-type", help = "Write an ENA checklist instead of a flat file (trnK_matK)")]
    checklist_type: Option<String>,

    #[arg(long = "gene-catalog", help = "CSV with token,symbol,product rows added to the built-in gene catalog")]
    gene_catalog: Option<String>,

    #[arg(long, help = "Write a JSON run report to this path")]
    report: Option<String>,

    #[arg(short, long, action = clap::ArgAction::Count, help = "More log output (repeatable)")]
    verbose: u8,

    #[arg(short, long, conflicts_with = "verbose", help = "Only log warnings and errors")]
    quiet: bool,

    #[arg(long = "build-info", help = "Print version and build number")]
    build_info: bool,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::Warn,
            (false, 0) => LevelFilter::Info,
            (false, 1) => LevelFilter::Debug,
            (false, _) => LevelFilter::Trace,
        }
    }

    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load_from_path(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(description) = &self.description {
            config.description = description.clone();
        }
        if let Some(table) = &self.transl_table {
            config.transl_table = table.clone();
        }
        if let Some(col) = &self.uniq_col {
            config.uniq_seqid_col = col.clone();
        }
        if self.fail_fast {
            config.policy = FailurePolicy::FailFast;
        }
        if self.parallel {
            config.parallel = true;
        }
        if let Some(checklist) = &self.checklist_type {
            config.checklist_type = Some(checklist.clone());
        }
        if let Some(catalog) = &self.gene_catalog {
            config.gene_catalog = Some(catalog.clone());
        }
        Ok(config)
    }
}

fn init_logging(level: LevelFilter) {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(level);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    let _ = builder.try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level());
    if cli.build_info {
        println!("{}", about::version_cli_text());
        return Ok(());
    }
    let (Some(nexus), Some(csv), Some(output)) = (&cli.nexus, &cli.csv, &cli.output) else {
        anyhow::bail!("--nexus, --csv and --output are required");
    };

    let config = cli.pipeline_config()?;
    let checklist = config.checklist()?;
    let mut catalog = GeneCatalog::builtin()?;
    if let Some(path) = &config.gene_catalog {
        catalog.extend(GeneCatalog::from_csv_path(path)?);
    }
    let pipeline = RecordPipeline::new(config, catalog)?;
    info!("Using translation table {:?}", pipeline.genetic_code());

    let alignment = Alignment::from_file(nexus)
        .with_context(|| format!("Could not load alignment '{nexus}'"))?;
    let metadata = MetadataTable::from_path(csv)
        .with_context(|| format!("Could not load metadata '{csv}'"))?;
    let outcomes = pipeline.run(&alignment, &metadata)?;

    let records: Vec<&Record> = outcomes.iter().filter_map(RecordOutcome::record).collect();
    let writer = BufWriter::new(
        File::create(output).with_context(|| format!("Could not create output '{output}'"))?,
    );
    match checklist {
        Some(checklist) => checklist.write_tsv(writer, &records)?,
        None => write_genbank_records(writer, &records)
            .with_context(|| format!("Could not write output '{output}'"))?,
    }
    info!("Wrote {} records to {output}", records.len());

    if let Some(path) = &cli.report {
        let report = pipeline.report(&outcomes);
        fs::write(path, report.to_json_pretty()?)
            .with_context(|| format!("Could not write report '{path}'"))?;
    }
    Ok(())
}
