use serde::{Deserialize, Serialize};

/// Logical fields the extractor looks for in the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Company,
    Sector,
    Year,
    Energy,
    Emissions,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Company,
        Field::Sector,
        Field::Year,
        Field::Energy,
        Field::Emissions,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Company => "company",
            Field::Sector => "sector",
            Field::Year => "year",
            Field::Energy => "energy",
            Field::Emissions => "emissions",
        }
    }
}

/// Accepted header tokens per field, in priority order (PT and EN).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSynonyms {
    pub company: Vec<String>,
    pub sector: Vec<String>,
    pub year: Vec<String>,
    pub energy: Vec<String>,
    pub emissions: Vec<String>,
}

const COMPANY: &[&str] = &["empresa", "company", "nome", "name", "entidade", "entity"];
const SECTOR: &[&str] = &["setor", "sector", "atividade", "activity", "cae"];
const YEAR: &[&str] = &["ano", "year", "período", "period"];
const ENERGY: &[&str] = &[
    "consumo",
    "consumption",
    "energia",
    "energy",
    "consumo_energia",
    "energy_consumption",
    "mwh",
    "kwh",
    "gj",
];
const EMISSIONS: &[&str] = &[
    "emissoes",
    "emissions",
    "co2",
    "carbono",
    "carbon",
    "emissoes_co2",
    "co2_emissions",
    "tco2",
    "tonnes_co2",
];

fn owned(tokens: &[&str]) -> Vec<String> {
    tokens.iter().map(|s| s.to_string()).collect()
}

impl Default for ColumnSynonyms {
    fn default() -> Self {
        Self {
            company: owned(COMPANY),
            sector: owned(SECTOR),
            year: owned(YEAR),
            energy: owned(ENERGY),
            emissions: owned(EMISSIONS),
        }
    }
}

impl ColumnSynonyms {
    pub fn for_field(&self, field: Field) -> &[String] {
        match field {
            Field::Company => &self.company,
            Field::Sector => &self.sector,
            Field::Year => &self.year,
            Field::Energy => &self.energy,
            Field::Emissions => &self.emissions,
        }
    }
}

/// A header chosen for a logical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMatch {
    /// Zero-based column index within the sheet's used range.
    pub index: usize,
    /// Header text as it appears in the sheet.
    pub header: String,
}

/// Resolved columns for every logical field. `None` means the field is
/// unavailable in this sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    pub company: Option<ColumnMatch>,
    pub sector: Option<ColumnMatch>,
    pub year: Option<ColumnMatch>,
    pub energy: Option<ColumnMatch>,
    pub emissions: Option<ColumnMatch>,
}

impl ColumnMap {
    pub fn get(&self, field: Field) -> Option<&ColumnMatch> {
        match field {
            Field::Company => self.company.as_ref(),
            Field::Sector => self.sector.as_ref(),
            Field::Year => self.year.as_ref(),
            Field::Energy => self.energy.as_ref(),
            Field::Emissions => self.emissions.as_ref(),
        }
    }

    /// Company or emissions must be present for the sheet to be usable.
    pub fn has_required(&self) -> bool {
        self.company.is_some() || self.emissions.is_some()
    }
}

/// Normalize a header for matching: lowercase, trim, whitespace runs become `_`.
pub fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Find the header that best matches a list of synonyms.
///
/// Synonyms are tried in priority order; for each one, headers are scanned
/// left to right and the first header whose normalized form contains the
/// synonym (or is contained in it) wins. Empty headers never match.
pub fn find_column<S: AsRef<str>>(headers: &[String], synonyms: &[S]) -> Option<ColumnMatch> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

    for synonym in synonyms {
        let synonym = synonym.as_ref().to_lowercase();
        if synonym.is_empty() {
            continue;
        }
        let hit = normalized
            .iter()
            .position(|h| !h.is_empty() && (h.contains(&synonym) || synonym.contains(h.as_str())));
        if let Some(index) = hit {
            return Some(ColumnMatch {
                index,
                header: headers[index].clone(),
            });
        }
    }

    None
}

/// Resolve all logical fields against a header row.
pub fn resolve_columns(headers: &[String], synonyms: &ColumnSynonyms) -> ColumnMap {
    ColumnMap {
        company: find_column(headers, synonyms.for_field(Field::Company)),
        sector: find_column(headers, synonyms.for_field(Field::Sector)),
        year: find_column(headers, synonyms.for_field(Field::Year)),
        energy: find_column(headers, synonyms.for_field(Field::Energy)),
        emissions: find_column(headers, synonyms.for_field(Field::Emissions)),
    }
}
