//! The `seed` binary: discover motifs shared across a FASTA file of
//! unaligned sequences. Grounded on `original_source/src/algorithms/seed.c`'s
//! `main`, minus the XML parameter/output dump (superseded by JSON, see
//! `seed::output`/`seed::params`).

use std::fs;
use std::fs::File;
use std::io::BufWriter;

use anyhow::Context;
use clap::Parser;
use log::info;

use seed::cli::SeedArgs;
use seed::discover;
use seed::io::fasta;
use seed::io::SequenceInput;
use seed::output;
use seed::suffix_array::VTree;

fn main() -> anyhow::Result<()> {
    let args = SeedArgs::parse();

    let level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new().filter_level(level).init();

    if args.energy {
        return Err(seed::error::SeedError::FeatureNotBuilt("thermodynamic energy scoring").into());
    }

    let file = File::open(&args.input).with_context(|| format!("reading {}", args.input.display()))?;
    let records = fasta::Reader::new(file).into_sequences()?;
    info!("loaded {} sequences", records.len());

    let seqs: Vec<_> = records.iter().map(|(_, s)| s.clone()).collect();
    let params = args.to_params(seqs.len())?;

    let (motifs, stats) = discover::discover(&seqs, &params)?;
    info!("{} motifs survived post-processing", motifs.len());

    fs::create_dir_all(&args.out_dir).with_context(|| format!("creating {}", args.out_dir.display()))?;

    let vs: Vec<_> = seqs
        .iter()
        .enumerate()
        .map(|(i, s)| VTree::build_with_id(s.symbols.clone(), Some(i)))
        .collect();
    let seed_seq = &seqs[params.seed];
    let report = output::build_report(&motifs, &vs, seed_seq, &params, &stats);

    if params.save_as_ct {
        for (mi, motif_report) in report.motifs.iter().enumerate() {
            for (ki, m) in motif_report.matches.iter().enumerate() {
                let path = args.out_dir.join(format!("motif{}_match{}.ct", mi, ki));
                let writer = BufWriter::new(
                    File::create(&path).with_context(|| format!("writing {}", path.display()))?,
                );
                let found = seed::matcher::Match {
                    id: m.sequence_id,
                    offset: m.offset,
                    length: m.length,
                    sequence: m.sequence.clone(),
                    structure: m.structure.clone(),
                };
                let v = &vs[m.sequence_id.expect("matches are always found against an identified vtree")];
                output::write_ct(&format!("motif{}", mi), v, &found, writer)?;
            }
        }
    }

    let report_path = args.out_dir.join("report.json");
    let writer = BufWriter::new(
        File::create(&report_path).with_context(|| format!("writing {}", report_path.display()))?,
    );
    output::write_json(&report, writer)?;
    info!("wrote {}", report_path.display());

    Ok(())
}
