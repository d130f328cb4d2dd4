use annonex::{
    checklist::ChecklistType,
    config::PipelineConfig,
    gene_catalog::GeneCatalog,
    metadata::MetadataTable,
    nexus::Alignment,
    record::{Record, write_genbank_records},
    RecordOutcome, RecordPipeline,
};
use gb_io::seq::{After, Before, Location};
use std::{fs, fs::File};

const NEXUS: &str = "#NEXUS
BEGIN DATA;
    DIMENSIONS NTAX=3 NCHAR=20;
    FORMAT DATATYPE=DNA MISSING=? GAP=-;
MATRIX
taxon_A  NNATGAAA-CCCTAAGGCTA
taxon_B  ??AAGAAA-CCCGGGGGCT?
taxon_X  ATGAAAAAACCCTAAGGCTA
;
END;
BEGIN SETS;
    CHARSET matK_CDS = 3-15;
    CHARSET trnK_intron = 16-20;
END;
";

const CSV: &str = "isolate,organism,country
taxon_A,Pyrus communis,Germany
taxon_B,Pyrus pyraster,
";

fn run(config: PipelineConfig, dir: &tempfile::TempDir) -> Vec<RecordOutcome> {
    let nexus = dir.path().join("alignment.nex");
    let csv = dir.path().join("metadata.csv");
    fs::write(&nexus, NEXUS).unwrap();
    fs::write(&csv, CSV).unwrap();

    let alignment = Alignment::from_file(nexus.to_str().unwrap()).unwrap();
    let metadata = MetadataTable::from_path(csv.to_str().unwrap()).unwrap();
    let pipeline = RecordPipeline::new(config, GeneCatalog::builtin().unwrap()).unwrap();
    pipeline.run(&alignment, &metadata).unwrap()
}

#[test]
fn test_nexus_and_csv_to_genbank() {
    let dir = tempfile::tempdir().unwrap();
    let outcomes = run(PipelineConfig::default(), &dir);
    assert_eq!(outcomes.len(), 3);
    assert!(matches!(outcomes[2], RecordOutcome::Dropped { ref name, .. } if name == "taxon_X"));

    let records: Vec<&Record> = outcomes.iter().filter_map(RecordOutcome::record).collect();
    let output = dir.path().join("out.gb");
    write_genbank_records(File::create(&output).unwrap(), &records).unwrap();

    let parsed = gb_io::reader::parse_file(output.to_str().unwrap()).unwrap();
    assert_eq!(parsed.len(), 2);

    let a = &parsed[0];
    assert_eq!(a.name.as_deref(), Some("taxon_A"));
    assert_eq!(a.seq.to_ascii_uppercase(), b"ATGAAACCCTAAGGCTA".to_vec());
    let kinds: Vec<String> = a.features.iter().map(|f| f.kind.to_string()).collect();
    assert_eq!(kinds, vec!["source", "CDS", "misc_feature"]);
    // stop codon confirmed, so it is cut from the location
    assert_eq!(
        a.features[1].location,
        Location::Range((0, Before(false)), (9, After(false)))
    );
    assert_eq!(
        a.features[2].location,
        Location::Range((12, Before(false)), (17, After(false)))
    );

    // no start and no stop codon: both ends open, trailing '?' trimmed as N
    let b = &parsed[1];
    assert_eq!(b.seq.to_ascii_uppercase(), b"AAGAAACCCGGGGGCT".to_vec());
    assert_eq!(
        b.features[1].location,
        Location::Range((0, Before(true)), (12, After(true)))
    );
    let source_quals: Vec<String> = b.features[0]
        .qualifiers
        .iter()
        .map(|(k, _)| k.to_string())
        .collect();
    assert!(!source_quals.contains(&"country".to_string()));
    assert!(source_quals.contains(&"mol_type".to_string()));
}

#[test]
fn test_checklist_output() {
    let dir = tempfile::tempdir().unwrap();
    let outcomes = run(PipelineConfig::default(), &dir);
    let records: Vec<&Record> = outcomes.iter().filter_map(RecordOutcome::record).collect();
    let output = dir.path().join("checklist.tsv");
    ChecklistType::TrnKMatK
        .write_tsv(File::create(&output).unwrap(), &records)
        .unwrap();
    let text = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("1\tPyrus communis\ttaxon_A\t\tGermany\t1\t9\tno\tno\t"));
    assert!(lines[2].contains("\tyes\tyes\t"));
}

#[test]
fn test_run_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = PipelineConfig::default();
    let outcomes = run(config.clone(), &dir);
    let pipeline = RecordPipeline::new(config, GeneCatalog::builtin().unwrap()).unwrap();
    let report = pipeline.report(&outcomes);
    assert_eq!(report.emitted(), 2);
    assert_eq!(report.dropped(), 1);
    assert_eq!(report.transl_table, 11);
    let json = report.to_json_pretty().unwrap();
    assert!(json.contains("\"name\": \"taxon_X\""));
}
