use clap::error::ErrorKind;
use clap::Parser;
use fastq_subsampler::cli::Args;
use fastq_subsampler::{run, InsufficientReads};

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                // 用法错误统一以 1 退出
                let _ = e.print();
                std::process::exit(1);
            }
        },
    };

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp(None)
        .format_target(false)
        .init();

    let config = args.into_config();
    if let Err(e) = run(&config) {
        if let Some(short) = e.downcast_ref::<InsufficientReads>() {
            println!("** warning: {}", short);
            println!("** warning: subsetting aborted");
        } else {
            log::error!("{:#}", e);
        }
        std::process::exit(1);
    }
}
