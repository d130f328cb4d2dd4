//! INSDC qualifier vocabulary accepted as metadata column names.

use lazy_static::lazy_static;
use std::collections::HashSet;

const INSDC_QUALIFIER_NAMES: &[&str] = &[
    "allele",
    "altitude",
    "anticodon",
    "artificial_location",
    "bio_material",
    "bound_moiety",
    "cell_line",
    "cell_type",
    "chromosome",
    "circular_RNA",
    "citation",
    "clone",
    "clone_lib",
    "codon_start",
    "collected_by",
    "collection_date",
    "compare",
    "country",
    "cultivar",
    "culture_collection",
    "db_xref",
    "dev_stage",
    "direction",
    "EC_number",
    "ecotype",
    "environmental_sample",
    "estimated_length",
    "exception",
    "experiment",
    "focus",
    "frequency",
    "function",
    "gap_type",
    "gene",
    "gene_synonym",
    "geo_loc_name",
    "germline",
    "haplogroup",
    "haplotype",
    "host",
    "identified_by",
    "inference",
    "isolate",
    "isolation_source",
    "lab_host",
    "lat_lon",
    "linkage_evidence",
    "locus_tag",
    "macronuclear",
    "map",
    "mating_type",
    "metagenome_source",
    "mobile_element_type",
    "mod_base",
    "mol_type",
    "ncRNA_class",
    "note",
    "number",
    "old_locus_tag",
    "operon",
    "organelle",
    "organism",
    "partial",
    "PCR_conditions",
    "PCR_primers",
    "phenotype",
    "plasmid",
    "pop_variant",
    "product",
    "protein_id",
    "proviral",
    "pseudo",
    "pseudogene",
    "rearranged",
    "recombination_class",
    "regulatory_class",
    "replace",
    "ribosomal_slippage",
    "rpt_family",
    "rpt_type",
    "rpt_unit_range",
    "rpt_unit_seq",
    "satellite",
    "segment",
    "serotype",
    "serovar",
    "sex",
    "specimen_voucher",
    "standard_name",
    "strain",
    "sub_clone",
    "sub_species",
    "sub_strain",
    "submitter_seqid",
    "tag_peptide",
    "tissue_lib",
    "tissue_type",
    "trans_splicing",
    "transgenic",
    "translation",
    "transl_except",
    "transl_table",
    "type_material",
    "variety",
];

lazy_static! {
    static ref INSDC_QUALIFIERS: HashSet<&'static str> =
        INSDC_QUALIFIER_NAMES.iter().copied().collect();
}

pub fn is_insdc_qualifier(name: &str) -> bool {
    INSDC_QUALIFIERS.contains(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown() {
        for name in ["allele", "altitude", "anticodon", "trans_splicing", "type_material", "variety"] {
            assert!(is_insdc_qualifier(name), "{name}");
        }
        assert!(!is_insdc_qualifier("MyInvalidQual_1"));
        // names are case sensitive
        assert!(!is_insdc_qualifier("Organism"));
    }
}
