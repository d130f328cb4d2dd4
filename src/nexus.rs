//! Reader for NEXUS alignments: the character matrix and the charset definitions.
//!
//! Supported: `DATA`/`CHARACTERS` blocks with sequential or interleaved
//! matrices, quoted taxon names, `[...]` comments, and `CHARSET` commands
//! made of positions, `a-b` ranges, `a-b\step` strides and `.` for the last
//! column. Sequential matrices may wrap a sequence over several lines only
//! when `NCHAR` is declared.

use crate::{
    coordinate_set::{Charsets, CoordinateSet},
    error::AnnonexError,
    sequence::Sequence,
};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::collections::BTreeMap;

lazy_static! {
    static ref COMMENT: Regex = Regex::new(r"\[[^\]]*\]").unwrap();
    static ref BLOCK: Regex =
        Regex::new(r"(?is)\bbegin\s+(\w+)\s*;(.*?)\bend(?:block)?\s*;").unwrap();
    static ref NCHAR: Regex = Regex::new(r"(?i)\bnchar\s*=\s*(\d+)").unwrap();
    static ref INTERLEAVE: Regex = Regex::new(r"(?i)\binterleave\b(?:\s*=\s*(\w+))?").unwrap();
    static ref MATRIX: Regex = Regex::new(r"(?is)\bmatrix\b(.*?);").unwrap();
    static ref CHARSET: Regex =
        Regex::new(r"(?i)\bcharset\s+('[^']*'|[^\s=;]+)\s*=\s*([^;]*);").unwrap();
    static ref CHARSET_TERM: Regex =
        Regex::new(r"(\d+|\.)(?:\s*-\s*(\d+|\.))?(?:\s*\\\s*(\d+))?").unwrap();
}

const WHAT: &str = "NEXUS alignment";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Alignment {
    pub sequences: BTreeMap<String, Sequence>,
    pub charsets: Charsets,
    /// Number of alignment columns.
    pub nchar: usize,
}

impl Alignment {
    pub fn from_file(path: &str) -> Result<Self, AnnonexError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AnnonexError::Io(std::io::Error::new(
                e.kind(),
                format!("Could not read alignment file '{path}': {e}"),
            ))
        })?;
        Self::from_nexus_str(&text)
    }

    pub fn from_nexus_str(text: &str) -> Result<Self, AnnonexError> {
        let text = COMMENT.replace_all(text, "");
        if !text.trim_start().to_ascii_lowercase().starts_with("#nexus") {
            return Err(AnnonexError::parse(WHAT, "missing #NEXUS header"));
        }

        let mut rows = None;
        let mut declared_nchar = None;
        let mut charset_bodies = vec![];
        for block in BLOCK.captures_iter(&text) {
            let body = &block[2];
            match block[1].to_ascii_lowercase().as_str() {
                "data" | "characters" => {
                    declared_nchar = NCHAR
                        .captures(body)
                        .and_then(|c| c[1].parse::<usize>().ok());
                    let interleaved = INTERLEAVE
                        .captures(body)
                        .is_some_and(|c| c.get(1).is_none_or(|v| !v.as_str().eq_ignore_ascii_case("no")));
                    let matrix = MATRIX
                        .captures(body)
                        .ok_or_else(|| AnnonexError::parse(WHAT, "no MATRIX command"))?;
                    rows = Some(parse_matrix(&matrix[1], declared_nchar, interleaved)?);
                }
                "taxa" => {}
                _ => charset_bodies.push(body.to_string()),
            }
        }

        let rows = rows.ok_or_else(|| AnnonexError::parse(WHAT, "no DATA or CHARACTERS block"))?;
        let nchar = check_lengths(&rows, declared_nchar)?;
        let sequences: BTreeMap<String, Sequence> = rows
            .into_iter()
            .map(|(name, bases)| (name, Sequence::from_u8(&bases)))
            .collect();

        let mut charsets = Charsets::new();
        for body in &charset_bodies {
            for def in CHARSET.captures_iter(body) {
                let name = def[1].trim_matches('\'').to_string();
                let set = parse_charset_terms(&name, &def[2], nchar)?;
                charsets.insert(name, set);
            }
        }
        debug!(
            "read {} sequences of {} columns and {} charsets",
            sequences.len(),
            nchar,
            charsets.len()
        );
        Ok(Self {
            sequences,
            charsets,
            nchar,
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sequences.keys().map(String::as_str)
    }
}

fn parse_matrix(
    body: &str,
    nchar: Option<usize>,
    interleaved: bool,
) -> Result<Vec<(String, Vec<u8>)>, AnnonexError> {
    let mut rows: Vec<(String, Vec<u8>)> = vec![];
    let mut current: Option<usize> = None;
    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let (false, Some(n), Some(i)) = (interleaved, nchar, current) {
            if rows[i].1.len() < n {
                rows[i].1.extend(bases_of(line));
                continue;
            }
        }
        let (name, rest) = split_taxon_name(line)?;
        match rows.iter().position(|(n, _)| *n == name) {
            Some(i) => {
                rows[i].1.extend(bases_of(rest));
                current = Some(i);
            }
            None => {
                rows.push((name, bases_of(rest).collect()));
                current = Some(rows.len() - 1);
            }
        }
    }
    if rows.is_empty() {
        return Err(AnnonexError::parse(WHAT, "MATRIX contains no sequences"));
    }
    Ok(rows)
}

fn bases_of(text: &str) -> impl Iterator<Item = u8> + '_ {
    text.bytes().filter(|c| !c.is_ascii_whitespace())
}

fn split_taxon_name(line: &str) -> Result<(String, &str), AnnonexError> {
    if let Some(quoted) = line.strip_prefix('\'') {
        let close = quoted.find('\'').ok_or_else(|| {
            AnnonexError::parse(WHAT, format!("unterminated quoted taxon name in '{line}'"))
        })?;
        return Ok((quoted[..close].to_string(), &quoted[close + 1..]));
    }
    Ok(match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name.to_string(), rest),
        None => (line.to_string(), ""),
    })
}

fn check_lengths(rows: &[(String, Vec<u8>)], declared: Option<usize>) -> Result<usize, AnnonexError> {
    let nchar = declared.unwrap_or(rows[0].1.len());
    if let Some((name, bases)) = rows.iter().find(|(_, b)| b.len() != nchar) {
        return Err(AnnonexError::parse(
            WHAT,
            format!(
                "sequence '{name}' has {} columns, expected {nchar}",
                bases.len()
            ),
        ));
    }
    Ok(nchar)
}

fn parse_charset_terms(name: &str, terms: &str, nchar: usize) -> Result<CoordinateSet, AnnonexError> {
    let leftover = CHARSET_TERM.replace_all(terms, "");
    if !leftover.trim().is_empty() {
        return Err(AnnonexError::parse(
            WHAT,
            format!("unsupported terms in charset '{name}': '{}'", leftover.trim()),
        ));
    }
    let column = |text: &str| -> Result<usize, AnnonexError> {
        if text == "." {
            return Ok(nchar);
        }
        let value = text
            .parse::<usize>()
            .map_err(|e| AnnonexError::parse(WHAT, format!("charset '{name}': {e}")))?;
        if value == 0 || value > nchar {
            return Err(AnnonexError::parse(
                WHAT,
                format!("charset '{name}' refers to column {value} outside 1..{nchar}"),
            ));
        }
        Ok(value)
    };

    let mut positions = vec![];
    for term in CHARSET_TERM.captures_iter(terms) {
        let start = column(&term[1])?;
        let end = match term.get(2) {
            Some(end) => column(end.as_str())?,
            None => start,
        };
        let step = match term.get(3) {
            Some(step) => step.as_str().parse::<usize>().unwrap_or(0),
            None => 1,
        };
        if step == 0 || end < start {
            return Err(AnnonexError::parse(
                WHAT,
                format!("charset '{name}' has an invalid range '{}'", &term[0]),
            ));
        }
        positions.extend((start..=end).step_by(step));
    }
    Ok(CoordinateSet::new(positions))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEQUENTIAL: &str = "#NEXUS
[written by hand]
BEGIN DATA;
    DIMENSIONS NTAX=3 NCHAR=12;
    FORMAT DATATYPE=DNA MISSING=? GAP=-;
MATRIX
taxon_B NNATGAAA-TAA
'taxon C' ATGAAAG-GTAA
taxon_A ATGAAA
        CCCTAA
;
END;
BEGIN SETS;
    CHARSET matK_CDS = 1-12;
    CHARSET 'trnK intron' = 2 4-6 10-.;
    CHARSET codon3 = 3-12\\3;
END;
";

    #[test]
    fn test_sequential_matrix_and_charsets() {
        let aln = Alignment::from_nexus_str(SEQUENTIAL).unwrap();
        assert_eq!(aln.nchar, 12);
        let names: Vec<&str> = aln.names().collect();
        assert_eq!(names, vec!["taxon C", "taxon_A", "taxon_B"]);
        assert_eq!(aln.sequences["taxon_A"].to_string(), "ATGAAACCCTAA");
        assert_eq!(aln.charsets["matK_CDS"], CoordinateSet::from_range(1, 12));
        assert_eq!(
            aln.charsets["trnK intron"].positions(),
            &[2, 4, 5, 6, 10, 11, 12]
        );
        assert_eq!(aln.charsets["codon3"].positions(), &[3, 6, 9, 12]);
    }

    #[test]
    fn test_interleaved_matrix() {
        let text = "#NEXUS
begin characters;
  dimensions nchar=8;
  format datatype=dna interleave;
  matrix
    t1 ATGA
    t2 AT-A
    t1 AATT
    t2 CCGG
  ;
end;
";
        let aln = Alignment::from_nexus_str(text).unwrap();
        assert_eq!(aln.sequences["t1"].to_string(), "ATGAAATT");
        assert_eq!(aln.sequences["t2"].to_string(), "AT-ACCGG");
        assert!(aln.charsets.is_empty());
    }

    #[test]
    fn test_unequal_lengths_are_rejected() {
        let text = "#NEXUS\nbegin data;\nmatrix\nt1 ATGA\nt2 ATG\n;\nend;\n";
        let err = Alignment::from_nexus_str(text).unwrap_err();
        assert!(err.to_string().contains("t2"));
    }

    #[test]
    fn test_charset_beyond_alignment_is_rejected() {
        let text = "#NEXUS\nbegin data;\nmatrix\nt1 ATGA\n;\nend;\nbegin sets;\ncharset x = 2-9;\nend;\n";
        let err = Alignment::from_nexus_str(text).unwrap_err();
        assert!(err.to_string().contains("column 9"));
    }

    #[test]
    fn test_missing_header_or_matrix() {
        assert!(Alignment::from_nexus_str("begin data; matrix t1 A; end;").is_err());
        assert!(Alignment::from_nexus_str("#NEXUS\nbegin taxa;\nend;\n").is_err());
    }
}
