//! Gene token to official symbol and product lookup.

use crate::error::AnnonexError;
use csv::ReaderBuilder;
use serde::Deserialize;
use std::{collections::HashMap, fs::File, io::Read};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct GeneEntry {
    pub symbol: String,
    pub product: String,
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    token: String,
    symbol: String,
    product: String,
}

#[derive(Clone, Debug, Default)]
pub struct GeneCatalog {
    entries: HashMap<String, GeneEntry>,
}

impl GeneCatalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self, AnnonexError> {
        Self::from_reader(include_str!("../assets/gene_catalog.csv").as_bytes())
    }

    pub fn from_csv_path(path: &str) -> Result<Self, AnnonexError> {
        let file = File::open(path).map_err(|e| {
            AnnonexError::Configuration(format!("Could not read gene catalog '{path}': {e}"))
        })?;
        Self::from_reader(file)
    }

    /// Reads `token,symbol,product` rows; tokens are matched case-insensitively.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, AnnonexError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut entries = HashMap::new();
        for row in rdr.deserialize() {
            let row: CatalogRow = row?;
            entries.insert(
                row.token.to_lowercase(),
                GeneEntry {
                    symbol: row.symbol,
                    product: row.product,
                },
            );
        }
        Ok(Self { entries })
    }

    /// Adds or replaces entries from another catalog.
    pub fn extend(&mut self, other: GeneCatalog) {
        self.entries.extend(other.entries);
    }

    pub fn get(&self, token: &str) -> Option<&GeneEntry> {
        self.entries.get(&token.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin() {
        let catalog = GeneCatalog::builtin().unwrap();
        assert!(!catalog.is_empty());
        let matk = catalog.get("matK").unwrap();
        assert_eq!(matk.symbol, "matK");
        assert_eq!(matk.product, "maturase K");
        assert_eq!(
            catalog.get("rbcl").unwrap().product,
            "ribulose-1,5-bisphosphate carboxylase/oxygenase large subunit"
        );
        assert_eq!(catalog.get("trnK").unwrap().product, "tRNA-Lys");
    }

    #[test]
    fn test_extend_overrides() {
        let mut catalog = GeneCatalog::builtin().unwrap();
        let size = catalog.len();
        let custom = GeneCatalog::from_reader(
            "token,symbol,product\nmatk,matK,maturase K protein\nabc1,abc1,ABC transporter\n"
                .as_bytes(),
        )
        .unwrap();
        catalog.extend(custom);
        assert_eq!(catalog.len(), size + 1);
        assert_eq!(catalog.get("MATK").unwrap().product, "maturase K protein");
    }

    #[test]
    fn test_malformed_catalog() {
        let err = GeneCatalog::from_reader("token,symbol\nmatk,matK\n".as_bytes());
        assert!(err.is_err());
    }
}
