//! The `seed-find` binary: match one known stem, given by its coordinates
//! in a reference sequence, against a separate set of candidate
//! sequences. The standalone-matcher counterpart to full discovery,
//! grounded the same way `seed.rs` is on `original_source/src/algorithms/seed.c`,
//! but skipping straight to `L5` instead of running the whole pipeline.

use std::fs;
use std::fs::File;
use std::io::BufWriter;

use anyhow::Context;
use clap::Parser;
use log::info;

use seed::cli::FindArgs;
use seed::io::fasta;
use seed::io::SequenceInput;
use seed::matcher;
use seed::motif;
use seed::output::{self, MatchReport};
use seed::suffix_array::VTree;

fn main() -> anyhow::Result<()> {
    let args = FindArgs::parse();

    let level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new().filter_level(level).init();

    if args.stem_end < args.stem_start + 2 * args.stem_length.saturating_sub(1) {
        anyhow::bail!(
            "stem_end ({}) too small for stem_start ({}) and stem_length ({})",
            args.stem_end,
            args.stem_start,
            args.stem_length
        );
    }

    let reference_file =
        File::open(&args.reference).with_context(|| format!("reading {}", args.reference.display()))?;
    let mut reference_records = fasta::Reader::new(reference_file).into_sequences()?;
    if reference_records.len() != 1 {
        anyhow::bail!(
            "expected exactly one sequence in {}, found {}",
            args.reference.display(),
            reference_records.len()
        );
    }
    let (_, seed_seq) = reference_records.remove(0);

    let mut stem = motif::new_stem_motif(args.stem_start, args.stem_end, args.stem_length, 0);
    for i in 0..args.stem_length {
        stem.nodes[stem.root].mask.as_mut().unwrap().insert(i);
    }
    stem.num_fixed_pos = args.stem_length;

    let input_file = File::open(&args.input).with_context(|| format!("reading {}", args.input.display()))?;
    let records = fasta::Reader::new(input_file).into_sequences()?;
    info!("loaded {} candidate sequences", records.len());

    let params = args.to_params();
    let vs: Vec<VTree> = records
        .iter()
        .enumerate()
        .map(|(i, (_, s))| VTree::build_with_id(s.symbols.clone(), Some(i)))
        .collect();
    let mut matches = Vec::new();
    for v in &vs {
        matches.extend(matcher::find_matches(v, &stem, &seed_seq, params.save_all_matches, &params));
    }
    info!("{} matches found", matches.len());

    fs::create_dir_all(&args.out_dir).with_context(|| format!("creating {}", args.out_dir.display()))?;

    if params.save_as_ct {
        for (i, found) in matches.iter().enumerate() {
            let path = args.out_dir.join(format!("match{}.ct", i));
            let writer =
                BufWriter::new(File::create(&path).with_context(|| format!("writing {}", path.display()))?);
            let v = &vs[found.id.expect("matches are always found against an identified vtree")];
            output::write_ct("match", v, found, writer)?;
        }
    }

    let report_path = args.out_dir.join("matches.json");
    let writer = BufWriter::new(
        File::create(&report_path).with_context(|| format!("writing {}", report_path.display()))?,
    );
    let report: Vec<MatchReport> = matches.into_iter().map(MatchReport::from).collect();
    serde_json::to_writer_pretty(writer, &report).context("writing matches.json")?;
    info!("wrote {}", report_path.display());

    Ok(())
}
