//! Reportable-gene panel membership.

use std::{io::BufReader, path::Path};

/// One row of the gene panel file.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct PanelGene {
    /// Official gene symbol.
    pub gene_symbol: String,
}

/// Load a gene panel file.
///
/// # Arguments
///
/// * `path` - Path to the panel TSV file with the field `gene_symbol`.
///
/// # Returns
///
/// Panel records.
///
/// # Errors
///
/// If anything goes wrong, it returns a generic `anyhow::Error`.
pub fn load_file<P>(path: P) -> Result<Vec<PanelGene>, anyhow::Error>
where
    P: AsRef<Path>,
{
    // Construct buffered file and CSV reader.
    let reader = std::fs::File::open(path)
        .map_err(|e| anyhow::anyhow!("problem opening file: {}", e))
        .map(BufReader::new)?;
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);
    let mut result = Vec::new();
    for record in csv_reader.deserialize() {
        let record = record.map_err(|e| anyhow::anyhow!("problem parsing record: {}", e))?;
        result.push(record);
    }

    Ok(result)
}

/// Facade struct for the reportable-gene panel.
///
/// Only genes on the panel are eligible to appear as reported drivers.
#[derive(Debug, Clone)]
pub struct Data {
    /// Symbols of the genes on the panel.
    symbols: rustc_hash::FxHashSet<String>,
}

impl Data {
    /// Load from file and construct.
    pub fn load<P>(path: P) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path>,
    {
        let records = load_file(path)?;
        Ok(Self::new(
            records.into_iter().map(|record| record.gene_symbol),
        ))
    }

    /// Create a new `Data` object from gene symbols.
    pub fn new<I>(symbols: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            symbols: symbols.into_iter().collect(),
        }
    }

    /// Whether the given gene is on the panel.
    ///
    /// # Arguments
    ///
    /// * `gene` - Gene symbol.
    ///
    /// # Returns
    ///
    /// Whether drivers on `gene` may be emitted.
    pub fn include(&self, gene: &str) -> bool {
        self.symbols.contains(gene)
    }
}
