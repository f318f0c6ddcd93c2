// io.rs - FASTQ 读写

use anyhow::{Context, Result};
use fastq::{Parser, Record, RefRecord};
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

fn is_gzip(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("gz")
}

/// 末行缺少换行符时补一个 '\n'，否则解析器会把最后一条记录视为截断
struct NewlineTerminated<R> {
    inner: R,
    last: Option<u8>,
    finished: bool,
}

impl<R: Read> NewlineTerminated<R> {
    fn new(inner: R) -> Self {
        NewlineTerminated {
            inner,
            last: None,
            finished: false,
        }
    }
}

impl<R: Read> Read for NewlineTerminated<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.finished || buf.is_empty() {
            return Ok(0);
        }
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.last = Some(buf[n - 1]);
            return Ok(n);
        }
        self.finished = true;
        match self.last {
            Some(b) if b != b'\n' => {
                buf[0] = b'\n';
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

/// 打开 FASTQ 输入，`.gz` 结尾时按多成员 gzip 解压
pub fn open_reader(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    if is_gzip(path) {
        let decoder = NewlineTerminated::new(MultiGzDecoder::new(file));
        Ok(Box::new(BufReader::with_capacity(2 << 20, decoder)))
    } else {
        Ok(Box::new(BufReader::with_capacity(2 << 20, NewlineTerminated::new(file))))
    }
}

/// FASTQ 输出；gzip 需要 `finish` 才会写出尾部
pub enum FastqWriter {
    Plain(BufWriter<File>),
    Gzip(BufWriter<GzEncoder<File>>),
}

impl FastqWriter {
    /// 刷新缓冲并结束 gzip 流，错误不会在 drop 时被吞掉
    pub fn finish(self) -> io::Result<()> {
        match self {
            FastqWriter::Plain(mut writer) => writer.flush(),
            FastqWriter::Gzip(writer) => {
                let encoder = writer.into_inner().map_err(|e| e.into_error())?;
                encoder.finish()?;
                Ok(())
            }
        }
    }
}

impl Write for FastqWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            FastqWriter::Plain(writer) => writer.write(buf),
            FastqWriter::Gzip(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            FastqWriter::Plain(writer) => writer.flush(),
            FastqWriter::Gzip(writer) => writer.flush(),
        }
    }
}

/// 创建（或覆盖）输出文件，`.gz` 结尾时 gzip 压缩
pub fn create_writer(path: &Path) -> Result<FastqWriter> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;

    if is_gzip(path) {
        // level 1: 速度优先
        let encoder = GzEncoder::new(file, Compression::new(1));
        Ok(FastqWriter::Gzip(BufWriter::with_capacity(4 << 20, encoder)))
    } else {
        Ok(FastqWriter::Plain(BufWriter::with_capacity(4 << 20, file)))
    }
}

/// 配对用的 read ID（移除 /1 或 /2 后缀）
pub fn mate_key(head: &[u8]) -> &[u8] {
    if head.ends_with(b"/1") || head.ends_with(b"/2") {
        &head[..head.len() - 2]
    } else {
        head
    }
}

/// 逐条遍历记录；回调返回错误时立即停止并向上传递
pub fn for_each_record<F>(path: &Path, mut func: F) -> Result<()>
where
    F: FnMut(&RefRecord) -> io::Result<()>,
{
    let reader = open_reader(path)?;
    let mut failed: Option<io::Error> = None;

    Parser::new(reader)
        .each(|record| match func(&record) {
            Ok(()) => true,
            Err(e) => {
                failed = Some(e);
                false
            }
        })
        .with_context(|| format!("invalid fastq record in {}", path.display()))?;

    match failed {
        Some(e) => Err(e).with_context(|| format!("failed while processing {}", path.display())),
        None => Ok(()),
    }
}

/// 计数遍：只数记录，不保留内容
pub fn count_records(path: &Path) -> Result<usize> {
    let mut total = 0usize;
    for_each_record(path, |_| {
        total += 1;
        Ok(())
    })?;
    Ok(total)
}

/// 原样写出一条记录：@id / seq / + / qual
pub fn write_record<W: Write + ?Sized>(record: &RefRecord, writer: &mut W) -> io::Result<()> {
    writer.write_all(b"@")?;
    writer.write_all(record.head())?;
    writer.write_all(b"\n")?;
    writer.write_all(record.seq())?;
    writer.write_all(b"\n+\n")?;
    writer.write_all(record.qual())?;
    writer.write_all(b"\n")
}
