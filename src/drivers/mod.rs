//! Molecular driver extraction from a tumor WGS analysis bundle.

pub mod data;
pub mod ds;
pub mod extract;

use std::path::PathBuf;

use clap::Parser;

/// Command line arguments for `drivers` command.
#[derive(Parser, Debug)]
#[command(about = "Extraction of molecular driver events", long_about = None)]
pub struct Args {
    /// Path to the analysis bundle JSON file.
    #[clap(long)]
    pub path_bundle: PathBuf,
    /// Path to the reportable-gene panel TSV file.
    #[clap(long)]
    pub path_gene_panel: PathBuf,
    /// Path to the gene annotation TSV file.
    #[clap(long)]
    pub path_known_genes: PathBuf,
    /// Path to the known fusion TSV file.
    #[clap(long)]
    pub path_known_fusions: PathBuf,
    /// Path to the actionable treatment TSV file.
    #[clap(long)]
    pub path_actionable: PathBuf,
    /// Path to the output JSON file; stdout when absent.
    #[clap(long)]
    pub path_output: Option<PathBuf>,
}

/// Main entry point for the `drivers` command.
///
/// # Arguments
///
/// * `common_args` - Commonly used command line arguments.
/// * `args` - Command line arguments specific to `drivers` command.
///
/// # Errors
///
/// If anything goes wrong, it returns a generic `anyhow::Error`.
pub fn run(common_args: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    tracing::info!("  running command `drivers`");
    tracing::info!("  common_args = {:?}", &common_args);
    tracing::info!("  args = {:?}", &args);

    let genes = data::genes::Data::load(&args.path_gene_panel)
        .map_err(|e| anyhow::anyhow!("failed to load gene panel: {}", e))?;
    let evidence = data::evidence::Data::load(
        &args.path_known_genes,
        &args.path_known_fusions,
        &args.path_actionable,
    )
    .map_err(|e| anyhow::anyhow!("failed to load evidence database: {}", e))?;
    let bundle = ds::AnalysisBundle::load(&args.path_bundle)
        .map_err(|e| anyhow::anyhow!("failed to load analysis bundle: {}", e))?;

    let extractor = extract::Extractor::new(&genes, &evidence);
    let drivers = extractor
        .extract(&bundle)
        .map_err(|e| anyhow::anyhow!("driver extraction failed: {}", e))?;

    for driver in drivers.drivers() {
        tracing::debug!(
            "- {} (reported: {}, likelihood: {:?})",
            driver.event(),
            driver.reported(),
            driver.driver_likelihood()
        );
    }
    tracing::info!(
        "extracted {} driver events: {} variants, {} amplifications, {} losses, \
         {} homozygous disruptions, {} disruptions, {} fusions, {} viruses",
        drivers.len(),
        drivers.variants.len(),
        drivers.amplifications.len(),
        drivers.losses.len(),
        drivers.homozygous_disruptions.len(),
        drivers.disruptions.len(),
        drivers.fusions.len(),
        drivers.viruses.len()
    );

    let json = serde_json::to_string_pretty(&drivers)?;
    if let Some(path_output) = &args.path_output {
        std::fs::write(path_output, json)
            .map_err(|e| anyhow::anyhow!("failed to write output: {}", e))?;
    } else {
        println!("{json}");
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use crate::drivers::extract::result::Drivers;

    #[test]
    fn run_smoke() -> Result<(), anyhow::Error> {
        let common = crate::common::Args {
            verbose: clap_verbosity_flag::Verbosity::new(1, 0),
        };
        let tmp_dir = tempfile::tempdir()?;
        let path_output = tmp_dir.path().join("drivers.json");

        let args = super::Args {
            path_bundle: "tests/data/drivers/bundle.json".into(),
            path_gene_panel: "tests/data/drivers/gene_panel.tsv".into(),
            path_known_genes: "tests/data/drivers/known_genes.tsv".into(),
            path_known_fusions: "tests/data/drivers/known_fusions.tsv".into(),
            path_actionable: "tests/data/drivers/actionable.tsv".into(),
            path_output: Some(path_output.clone()),
        };

        super::run(&common, &args)?;

        let drivers: Drivers = serde_json::from_str(&std::fs::read_to_string(path_output)?)?;
        assert_eq!(drivers.len(), 7);
        assert_eq!(drivers.variants.len(), 1);
        assert_eq!(drivers.disruptions.len(), 1);

        Ok(())
    }
}
