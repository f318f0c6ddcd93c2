// subsample.rs - 计数、抽样、写出

use crate::io::{count_records, create_writer, for_each_record, mate_key, write_record};
use crate::sample::Selection;
use anyhow::{bail, Context, Result};
use fastq::Record;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// R2 输入与对应输出，二者必须同时给出
#[derive(Debug, Clone)]
pub struct ReversePaths {
    pub reads: PathBuf,
    pub output: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SubsampleConfig {
    pub forward_reads: PathBuf,
    pub forward_output: PathBuf,
    pub reverse: Option<ReversePaths>,
    pub n_reads: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsampleSummary {
    pub total_reads: usize,
    pub forward_written: usize,
    pub reverse_written: Option<usize>,
}

/// 请求的 reads 数超过文件中的总数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsufficientReads {
    pub available: usize,
    pub requested: usize,
}

impl fmt::Display for InsufficientReads {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "only {} reads detected but {} were requested",
            self.available, self.requested
        )
    }
}

impl Error for InsufficientReads {}

/// 两个路径是否指向同一文件；不存在的路径按字面比较
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// 输出不能覆盖任何输入，两个输出也不能相同
fn check_output_paths(config: &SubsampleConfig) -> Result<()> {
    let mut inputs = vec![config.forward_reads.as_path()];
    let mut outputs = vec![config.forward_output.as_path()];
    if let Some(reverse) = &config.reverse {
        inputs.push(reverse.reads.as_path());
        outputs.push(reverse.output.as_path());
    }

    for output in &outputs {
        if let Some(input) = inputs.iter().find(|input| same_file(input, output)) {
            bail!(
                "output {} would overwrite input {}",
                output.display(),
                input.display()
            );
        }
    }
    if outputs.len() == 2 && same_file(outputs[0], outputs[1]) {
        bail!(
            "forward and reverse output are the same file: {}",
            outputs[0].display()
        );
    }
    Ok(())
}

pub fn run(config: &SubsampleConfig) -> Result<SubsampleSummary> {
    check_output_paths(config)?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    println!("Scanning fastq file and calculating number of reads");
    let total_reads = count_records(&config.forward_reads)?;
    println!(
        "detected {} reads in {}",
        total_reads,
        config.forward_reads.display()
    );

    // 容量检查先于任何输出文件的创建
    if config.n_reads > total_reads {
        return Err(InsufficientReads {
            available: total_reads,
            requested: config.n_reads,
        }
        .into());
    }

    let selection = Selection::draw(&mut rng, total_reads, config.n_reads);
    log::debug!(
        "selected {} of {} positions",
        selection.len(),
        total_reads
    );

    let (forward_written, forward_ids) =
        write_selected(&config.forward_reads, &config.forward_output, &selection)?;
    println!(
        "** wrote {} reads to {}",
        forward_written,
        config.forward_output.display()
    );

    let reverse_written = match &config.reverse {
        Some(reverse) => {
            let written = write_mates(&reverse.reads, &reverse.output, &forward_ids)?;
            println!(
                "** wrote {} reads to {}",
                written,
                reverse.output.display()
            );
            if written < forward_written {
                log::warn!(
                    "{} of {} selected reads have no mate in {}",
                    forward_written - written,
                    forward_written,
                    reverse.reads.display()
                );
            }
            Some(written)
        }
        None => None,
    };

    Ok(SubsampleSummary {
        total_reads,
        forward_written,
        reverse_written,
    })
}

/// 第二遍扫描 R1，按位置写出被选中的记录，并收集其配对 ID
pub fn write_selected(
    input: &Path,
    output: &Path,
    selection: &Selection,
) -> Result<(usize, HashSet<Vec<u8>>)> {
    log::debug!("writing selected reads from {} to {}", input.display(), output.display());
    let mut writer = create_writer(output)?;
    let mut ids = HashSet::with_capacity(selection.len());
    let mut position = 0usize;
    let mut written = 0usize;

    for_each_record(input, |record| {
        position += 1;
        if selection.contains(position) {
            ids.insert(mate_key(record.head()).to_vec());
            write_record(record, &mut writer)?;
            written += 1;
        }
        Ok(())
    })?;

    writer
        .finish()
        .with_context(|| format!("failed to finish {}", output.display()))?;
    Ok((written, ids))
}

/// 扫描 R2，写出 ID 出现在 R1 输出中的记录（保持 R2 自身顺序）
pub fn write_mates(input: &Path, output: &Path, ids: &HashSet<Vec<u8>>) -> Result<usize> {
    log::debug!("writing mates from {} to {}", input.display(), output.display());
    let mut writer = create_writer(output)?;
    let mut written = 0usize;

    for_each_record(input, |record| {
        if ids.contains(mate_key(record.head())) {
            write_record(record, &mut writer)?;
            written += 1;
        }
        Ok(())
    })?;

    writer
        .finish()
        .with_context(|| format!("failed to finish {}", output.display()))?;
    Ok(written)
}
