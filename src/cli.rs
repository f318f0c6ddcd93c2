// cli.rs - 命令行参数

use crate::subsample::{ReversePaths, SubsampleConfig};
use clap::builder::RangedU64ValueParser;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sub_sampler")]
#[command(version, about = "Randomly subsample fastq files")]
#[command(arg_required_else_help = true)]
pub struct Args {
    #[arg(short = '1', long = "forward_reads", help = "fastq file containing forward R1 reads")]
    pub forward_reads: PathBuf,

    #[arg(
        short = '2',
        long = "reverse_reads",
        requires = "reverse_output",
        help = "fastq file containing reverse R2 reads (leave blank if only single-end reads)"
    )]
    pub reverse_reads: Option<PathBuf>,

    #[arg(
        short = 'n',
        long = "nReads",
        default_value = "100000",
        value_parser = RangedU64ValueParser::<usize>::new().range(1..),
        help = "number of reads required"
    )]
    pub n_reads: usize,

    #[arg(short = 'o', long = "forward_output", help = "output name for the subsetted forward file")]
    pub forward_output: PathBuf,

    #[arg(
        short = 'r',
        long = "reverse_output",
        requires = "reverse_reads",
        help = "output name for the subsetted reverse file (leave blank if only single-end reads)"
    )]
    pub reverse_output: Option<PathBuf>,

    #[arg(short = 's', long, help = "Seed for a reproducible draw (random if omitted)")]
    pub seed: Option<u64>,

    #[arg(short = 'v', long, help = "Verbose output (debug logging)")]
    pub verbose: bool,
}

impl Args {
    pub fn into_config(self) -> SubsampleConfig {
        // clap 已保证 -2 与 -r 成对出现
        let reverse = match (self.reverse_reads, self.reverse_output) {
            (Some(reads), Some(output)) => Some(ReversePaths { reads, output }),
            _ => None,
        };

        SubsampleConfig {
            forward_reads: self.forward_reads,
            forward_output: self.forward_output,
            reverse,
            n_reads: self.n_reads,
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn defaults_to_one_hundred_thousand_reads() {
        let args = Args::try_parse_from(["sub_sampler", "-1", "r1.fq", "-o", "out.fq"]).unwrap();
        assert_eq!(args.n_reads, 100_000);
        assert!(args.seed.is_none());
        assert!(args.into_config().reverse.is_none());
    }

    #[test]
    fn long_names_match_pipeline_flags() {
        let args = Args::try_parse_from([
            "sub_sampler",
            "--forward_reads",
            "r1.fq",
            "--reverse_reads",
            "r2.fq",
            "--nReads",
            "25",
            "--forward_output",
            "o1.fq",
            "--reverse_output",
            "o2.fq",
            "--seed",
            "3",
        ])
        .unwrap();
        let config = args.into_config();
        assert_eq!(config.n_reads, 25);
        assert_eq!(config.seed, Some(3));
        let reverse = config.reverse.unwrap();
        assert_eq!(reverse.reads, PathBuf::from("r2.fq"));
        assert_eq!(reverse.output, PathBuf::from("o2.fq"));
    }

    #[test]
    fn no_arguments_shows_help() {
        let err = Args::try_parse_from(["sub_sampler"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand);
    }

    #[test]
    fn forward_output_is_required() {
        let err = Args::try_parse_from(["sub_sampler", "-1", "r1.fq"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn reverse_reads_require_reverse_output() {
        let err = Args::try_parse_from(["sub_sampler", "-1", "r1.fq", "-2", "r2.fq", "-o", "o1.fq"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn reverse_output_requires_reverse_reads() {
        let err = Args::try_parse_from(["sub_sampler", "-1", "r1.fq", "-o", "o1.fq", "-r", "o2.fq"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn zero_reads_rejected() {
        let err = Args::try_parse_from(["sub_sampler", "-1", "r1.fq", "-o", "o1.fq", "-n", "0"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }
}
