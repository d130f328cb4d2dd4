//! Classification of charset names into feature kinds and gene identities.
//!
//! A charset named e.g. `matK_CDS` yields a CDS for gene `matK`; the gene
//! token is whatever remains once the kind keyword and separators are gone.

use crate::{feature::FeatureType, gene_catalog::GeneCatalog};

/// Keywords in priority order; the first one contained in a name wins.
pub const DEFAULT_KEYWORDS: &[(&str, FeatureType)] = &[
    ("cds", FeatureType::Cds),
    ("gene", FeatureType::Gene),
    ("rrna", FeatureType::RRna),
    ("trna", FeatureType::TRna),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharsetClass {
    pub feature_type: FeatureType,
    pub gene_symbol: Option<String>,
    pub product: Option<String>,
}

pub struct CharsetNameClassifier<'a> {
    keywords: Vec<(String, FeatureType)>,
    catalog: &'a GeneCatalog,
}

impl<'a> CharsetNameClassifier<'a> {
    pub fn new(catalog: &'a GeneCatalog) -> Self {
        Self::with_keywords(
            DEFAULT_KEYWORDS
                .iter()
                .map(|(kw, kind)| (kw.to_string(), *kind))
                .collect(),
            catalog,
        )
    }

    pub fn with_keywords(keywords: Vec<(String, FeatureType)>, catalog: &'a GeneCatalog) -> Self {
        let keywords = keywords
            .into_iter()
            .map(|(kw, kind)| (kw.to_lowercase(), kind))
            .collect();
        Self { keywords, catalog }
    }

    /// Never fails: names without a keyword become `misc_feature`, tokens
    /// missing from the catalog are used verbatim as the gene symbol.
    pub fn classify(&self, name: &str) -> CharsetClass {
        let lower = name.to_lowercase();
        let keyword = self
            .keywords
            .iter()
            .find(|(kw, _)| lower.contains(kw.as_str()));
        let feature_type = keyword
            .map(|(_, kind)| *kind)
            .unwrap_or(FeatureType::MiscFeature);

        let Some(token) = gene_token(name, keyword.map(|(kw, _)| kw.as_str())) else {
            return CharsetClass {
                feature_type,
                gene_symbol: None,
                product: None,
            };
        };
        match self.catalog.get(token) {
            Some(entry) => CharsetClass {
                feature_type,
                gene_symbol: Some(entry.symbol.clone()),
                product: Some(entry.product.clone()),
            },
            None => CharsetClass {
                feature_type,
                gene_symbol: Some(token.to_string()),
                product: None,
            },
        }
    }
}

/// First alphanumeric token of `name` that is not the kind keyword; a keyword
/// glued to the token (`matKcds`) is cut off.
fn gene_token<'n>(name: &'n str, keyword: Option<&str>) -> Option<&'n str> {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(|token| match keyword {
            Some(kw) => strip_keyword(token, kw),
            None => token,
        })
        .find(|token| !token.is_empty())
}

fn strip_keyword<'t>(token: &'t str, keyword: &str) -> &'t str {
    let lower = token.to_ascii_lowercase();
    if lower == keyword {
        ""
    } else if lower.ends_with(keyword) {
        &token[..token.len() - keyword.len()]
    } else if lower.starts_with(keyword) {
        &token[keyword.len()..]
    } else {
        token
    }
}
