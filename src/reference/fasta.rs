//! FASTA reference sequence provider
//!
//! Random access into uncompressed FASTA files through a `.fai` index.
//! When no index exists next to the FASTA it is built by scanning the file.
//!
//! Contig names are resolved across naming conventions, so the
//! `chr`-prefixed names used by the normalizers find sequences named `1`,
//! `chrM`, `MT` or `NC_000001.11`, and the other way round.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::FerroError;
use crate::reference::provider::SequenceProvider;

/// Index entry for a sequence in a FASTA file
#[derive(Debug, Clone)]
struct FastaIndexEntry {
    /// Sequence name
    name: String,
    /// Length of the sequence
    length: u64,
    /// Byte offset to the start of sequence data
    offset: u64,
    /// Number of bases per line
    line_bases: u64,
    /// Number of bytes per line (including newline)
    line_bytes: u64,
}

impl FastaIndexEntry {
    /// Byte offset of a 0-based base position within the file
    fn file_offset(&self, pos: u64) -> u64 {
        self.offset + (pos / self.line_bases) * self.line_bytes + pos % self.line_bases
    }

    /// Check a 0-based half-open interval against the sequence length
    fn check_interval(&self, start: u64, end: u64) -> Result<(), FerroError> {
        if start > end || end > self.length {
            return Err(FerroError::InvalidCoordinates {
                msg: format!(
                    "Position {}-{} out of range for {} (length {})",
                    start, end, self.name, self.length
                ),
            });
        }
        Ok(())
    }

    /// Reject line geometry that cannot address a non-empty sequence
    fn validate(&self) -> Result<(), FerroError> {
        if self.line_bases == 0 || self.line_bytes < self.line_bases {
            return Err(FerroError::Io {
                msg: format!(
                    "Invalid FASTA index entry for '{}': {} bases in {} bytes per line",
                    self.name, self.line_bases, self.line_bytes
                ),
            });
        }
        Ok(())
    }
}

/// RefSeq accessions of the primary assembly chromosomes
///
/// The accession stem is shared by GRCh37 and GRCh38; only the version
/// suffix differs between builds.
const REFSEQ_CHROMOSOMES: [(&str, &str); 25] = [
    ("NC_000001", "1"),
    ("NC_000002", "2"),
    ("NC_000003", "3"),
    ("NC_000004", "4"),
    ("NC_000005", "5"),
    ("NC_000006", "6"),
    ("NC_000007", "7"),
    ("NC_000008", "8"),
    ("NC_000009", "9"),
    ("NC_000010", "10"),
    ("NC_000011", "11"),
    ("NC_000012", "12"),
    ("NC_000013", "13"),
    ("NC_000014", "14"),
    ("NC_000015", "15"),
    ("NC_000016", "16"),
    ("NC_000017", "17"),
    ("NC_000018", "18"),
    ("NC_000019", "19"),
    ("NC_000020", "20"),
    ("NC_000021", "21"),
    ("NC_000022", "22"),
    ("NC_000023", "X"),
    ("NC_000024", "Y"),
    ("NC_012920", "MT"),
];

/// Reduce a contig name to a convention-free key
///
/// `chr1`, `1` and `NC_000001.11` all become `1`; `chrM`, `chrMT`, `M`,
/// `MT` and `NC_012920.1` all become `MT`. Other names are returned
/// without their `chr` prefix.
fn contig_key(name: &str) -> String {
    let stem = name.split_once('.').map_or(name, |(stem, _)| stem);
    if let Some((_, chromosome)) = REFSEQ_CHROMOSOMES.iter().find(|(acc, _)| *acc == stem) {
        return (*chromosome).to_string();
    }
    let bare = name.strip_prefix("chr").unwrap_or(name);
    match bare {
        "M" | "MT" => "MT".to_string(),
        _ => bare.to_string(),
    }
}

/// Sequence index plus the lookups that resolve contig names into it
#[derive(Debug, Clone, Default)]
struct ContigIndex {
    /// Entries keyed by the name in the FASTA header
    entries: HashMap<String, FastaIndexEntry>,
    /// Caller-supplied aliases to FASTA names
    aliases: HashMap<String, String>,
    /// Convention-free key to FASTA name
    keys: HashMap<String, String>,
}

impl ContigIndex {
    fn new(entries: HashMap<String, FastaIndexEntry>) -> Self {
        // Sorted so that the choice between names sharing a key is stable
        let mut names: Vec<&String> = entries.keys().collect();
        names.sort();

        let mut keys = HashMap::new();
        for name in names {
            keys.entry(contig_key(name)).or_insert_with(|| name.clone());
        }

        Self {
            entries,
            aliases: HashMap::new(),
            keys,
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn add_alias(&mut self, alias: &str, canonical: &str) {
        self.aliases
            .insert(alias.to_string(), canonical.to_string());
    }

    /// Find the entry for a contig by exact name, alias, then naming convention
    fn resolve(&self, name: &str) -> Option<&FastaIndexEntry> {
        let name = self.aliases.get(name).map_or(name, String::as_str);
        self.entries.get(name).or_else(|| {
            self.keys
                .get(&contig_key(name))
                .and_then(|fasta_name| self.entries.get(fasta_name))
        })
    }

    fn names(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }
}

/// FASTA-based reference sequence provider
///
/// Each fetch opens the file, seeks to the interval and reads only the
/// bytes it needs, so the provider holds no open handle and is `Sync`.
///
/// # Example
///
/// ```ignore
/// use ferro_vcfnorm::{FastaProvider, SequenceProvider};
///
/// let provider = FastaProvider::new("GRCh38.fa")?;
/// let bases = provider.fetch("chr1", 999, 1002)?;
/// ```
pub struct FastaProvider {
    /// Path to the FASTA file
    path: PathBuf,
    /// Index of sequences
    index: ContigIndex,
}

impl FastaProvider {
    /// Create a new FASTA provider from a file path
    ///
    /// Will look for an accompanying .fai index file. If not found,
    /// will build an index by scanning the FASTA file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be opened
    /// - The file is gzip-compressed (not supported)
    /// - The index is malformed
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, FerroError> {
        let path = path.as_ref().to_path_buf();
        let index = load_or_build_index(&path)?;

        log::debug!(
            "Indexed {} sequences in {}",
            index.len(),
            path.display()
        );

        Ok(Self { path, index })
    }

    /// Add a contig alias
    ///
    /// `canonical` may itself be in any naming convention the provider
    /// resolves.
    pub fn add_alias(&mut self, alias: &str, canonical: &str) {
        self.index.add_alias(alias, canonical);
    }

    /// Get the length of a sequence
    pub fn sequence_length(&self, name: &str) -> Option<u64> {
        self.entry(name).map(|e| e.length)
    }

    /// Check if a sequence exists
    pub fn has_sequence(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Get all sequence names
    pub fn sequence_names(&self) -> impl Iterator<Item = &String> {
        self.index.names()
    }

    fn entry(&self, name: &str) -> Option<&FastaIndexEntry> {
        self.index.resolve(name)
    }

    fn read_interval(
        &self,
        entry: &FastaIndexEntry,
        start: u64,
        end: u64,
    ) -> Result<String, FerroError> {
        entry.check_interval(start, end)?;
        if start == end {
            return Ok(String::new());
        }

        let seq_len = end - start;
        let byte_offset = start % entry.line_bases;
        let num_lines = (seq_len + byte_offset).div_ceil(entry.line_bases);
        // Newlines may be \r\n, so read whole line strides
        let line_terminator = entry.line_bytes - entry.line_bases;
        let bytes_to_read = seq_len + num_lines * line_terminator;

        let mut file = File::open(&self.path).map_err(|e| FerroError::Io {
            msg: format!("Failed to open FASTA file: {}", e),
        })?;
        file.seek(SeekFrom::Start(entry.file_offset(start)))
            .map_err(|e| FerroError::Io {
                msg: format!("Failed to seek in FASTA file: {}", e),
            })?;

        let mut buffer = Vec::with_capacity(bytes_to_read as usize);
        file.take(bytes_to_read)
            .read_to_end(&mut buffer)
            .map_err(|e| FerroError::Io {
                msg: format!("Failed to read from FASTA file: {}", e),
            })?;

        collect_bases(&buffer, seq_len, &entry.name)
    }
}

impl SequenceProvider for FastaProvider {
    fn fetch(&self, contig: &str, start: u64, end: u64) -> Result<String, FerroError> {
        let entry = self
            .entry(contig)
            .ok_or_else(|| FerroError::ReferenceNotFound {
                id: contig.to_string(),
            })?;
        self.read_interval(entry, start, end)
    }

    fn has_contig(&self, contig: &str) -> bool {
        self.has_sequence(contig)
    }
}

/// Memory-mapped FASTA provider
///
/// Uses memory-mapped I/O so that repeated small fetches against a large
/// reference are served from the page cache without syscalls.
///
/// # Feature
///
/// This requires the `mmap` feature to be enabled:
/// ```toml
/// ferro-vcfnorm = { version = "0.1", features = ["mmap"] }
/// ```
#[cfg(feature = "mmap")]
pub struct MmapFastaProvider {
    /// Memory-mapped file
    mmap: memmap2::Mmap,
    /// Index of sequences
    index: ContigIndex,
}

#[cfg(feature = "mmap")]
impl MmapFastaProvider {
    /// Create a new memory-mapped FASTA provider from a file path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, FerroError> {
        let path = path.as_ref();
        let index = load_or_build_index(path)?;

        let file = File::open(path).map_err(|e| FerroError::Io {
            msg: format!("Failed to open FASTA file: {}", e),
        })?;
        // SAFETY: the mapping is read-only and the reference is not
        // expected to change while the provider is alive.
        let mmap = unsafe {
            memmap2::Mmap::map(&file).map_err(|e| FerroError::Io {
                msg: format!("Failed to memory-map FASTA file: {}", e),
            })?
        };

        Ok(Self { mmap, index })
    }

    /// Add a contig alias
    pub fn add_alias(&mut self, alias: &str, canonical: &str) {
        self.index.add_alias(alias, canonical);
    }

    /// Check if a sequence exists
    pub fn has_sequence(&self, name: &str) -> bool {
        self.index.resolve(name).is_some()
    }

    /// Get the length of a sequence
    pub fn sequence_length(&self, name: &str) -> Option<u64> {
        self.index.resolve(name).map(|e| e.length)
    }
}

#[cfg(feature = "mmap")]
impl SequenceProvider for MmapFastaProvider {
    fn fetch(&self, contig: &str, start: u64, end: u64) -> Result<String, FerroError> {
        let entry = self
            .index
            .resolve(contig)
            .ok_or_else(|| FerroError::ReferenceNotFound {
                id: contig.to_string(),
            })?;
        entry.check_interval(start, end)?;
        if start == end {
            return Ok(String::new());
        }

        let from = (entry.file_offset(start) as usize).min(self.mmap.len());
        let to = (entry.file_offset(end - 1) as usize + 1).min(self.mmap.len());
        collect_bases(&self.mmap[from..to], end - start, &entry.name)
    }

    fn has_contig(&self, contig: &str) -> bool {
        self.has_sequence(contig)
    }
}

/// Strip line terminators from raw FASTA bytes and uppercase the bases
fn collect_bases(raw: &[u8], expected: u64, name: &str) -> Result<String, FerroError> {
    let sequence: String = raw
        .iter()
        .filter(|&&b| b != b'\n' && b != b'\r')
        .take(expected as usize)
        .map(|&b| (b as char).to_ascii_uppercase())
        .collect();

    if sequence.len() as u64 != expected {
        return Err(FerroError::Io {
            msg: format!(
                "Truncated FASTA data for {}: expected {} bases, read {}",
                name,
                expected,
                sequence.len()
            ),
        });
    }
    Ok(sequence)
}

/// Use the `.fai` next to a FASTA if present, otherwise scan the FASTA
fn load_or_build_index(path: &Path) -> Result<ContigIndex, FerroError> {
    if is_gzip_file(path)? {
        return Err(FerroError::Io {
            msg: format!(
                "FASTA file appears to be gzip-compressed: {}. \
                 Please decompress the file first (e.g., 'bgzip -d {}').",
                path.display(),
                path.display()
            ),
        });
    }

    let fai_path = PathBuf::from(format!("{}.fai", path.display()));
    let entries = if fai_path.exists() {
        load_fai_index(&fai_path)?
    } else {
        scan_fasta(path)?
    };
    Ok(ContigIndex::new(entries))
}

/// Load a FASTA index (.fai) file
///
/// Zero-length sequences are skipped, since nothing can be fetched from them.
fn load_fai_index(path: &Path) -> Result<HashMap<String, FastaIndexEntry>, FerroError> {
    let file = File::open(path).map_err(|e| FerroError::Io {
        msg: format!("Failed to open FAI file: {}", e),
    })?;
    let reader = BufReader::new(file);

    let mut index = HashMap::new();

    for line in reader.lines() {
        let line = line.map_err(|e| FerroError::Io {
            msg: format!("Failed to read FAI line: {}", e),
        })?;

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 5 {
            continue;
        }

        let name = fields[0].to_string();
        let parse_field = |value: &str, what: &str| -> Result<u64, FerroError> {
            value.parse().map_err(|_| FerroError::Io {
                msg: format!("Invalid {} '{}' in FAI for sequence '{}'", what, value, name),
            })
        };
        let length = parse_field(fields[1], "length")?;
        let offset = parse_field(fields[2], "offset")?;
        let line_bases = parse_field(fields[3], "line_bases")?;
        let line_bytes = parse_field(fields[4], "line_bytes")?;

        let entry = FastaIndexEntry {
            name,
            length,
            offset,
            line_bases,
            line_bytes,
        };
        add_entry(&mut index, entry)?;
    }

    Ok(index)
}

/// Add a finished entry to an index, skipping empty sequences
fn add_entry(
    index: &mut HashMap<String, FastaIndexEntry>,
    entry: FastaIndexEntry,
) -> Result<(), FerroError> {
    if entry.length == 0 {
        log::warn!("Sequence '{}' has no bases; it will not be indexed", entry.name);
        return Ok(());
    }
    entry.validate()?;
    if index.contains_key(&entry.name) {
        log::warn!("Duplicate sequence '{}'; keeping the last one", entry.name);
    }
    index.insert(entry.name.clone(), entry);
    Ok(())
}

/// Sequence record being measured while scanning a FASTA
struct RecordScan {
    entry: FastaIndexEntry,
    /// A line shorter than the record's line width has been seen
    ended: bool,
}

impl RecordScan {
    fn new(header: &[u8], offset: u64) -> Self {
        let header = String::from_utf8_lossy(header);
        let name = header.split_whitespace().next().unwrap_or_default().to_string();
        Self {
            entry: FastaIndexEntry {
                name,
                length: 0,
                offset,
                line_bases: 0,
                line_bytes: 0,
            },
            ended: false,
        }
    }

    /// Account for one sequence line of `bases` bases stored in `bytes` bytes at `offset`
    ///
    /// Every line but the last must have the width of the first, otherwise
    /// offsets computed from the index would point at the wrong bases.
    fn push_line(&mut self, offset: u64, bases: u64, bytes: u64) -> Result<(), FerroError> {
        let entry = &mut self.entry;
        if bases == 0 {
            self.ended = true;
            return Ok(());
        }
        if self.ended || (entry.line_bases > 0 && bases > entry.line_bases) {
            return Err(FerroError::Io {
                msg: format!(
                    "FASTA sequence '{}' has uneven line lengths at byte {}; \
                     reformat it (e.g., 'samtools faidx') before use",
                    entry.name, offset
                ),
            });
        }
        if entry.line_bases == 0 {
            entry.offset = offset;
            entry.line_bases = bases;
            entry.line_bytes = bytes;
        }
        self.ended = bases < entry.line_bases;
        entry.length += bases;
        Ok(())
    }
}

/// Build an index by reading the FASTA once
fn scan_fasta(path: &Path) -> Result<HashMap<String, FastaIndexEntry>, FerroError> {
    let file = File::open(path).map_err(|e| FerroError::Io {
        msg: format!("Failed to open FASTA file: {}", e),
    })?;
    let mut reader = BufReader::new(file);

    let mut index = HashMap::new();
    let mut current: Option<RecordScan> = None;
    let mut offset = 0u64;
    let mut line = Vec::new();

    loop {
        line.clear();
        let bytes = reader
            .read_until(b'\n', &mut line)
            .map_err(|e| FerroError::Io {
                msg: format!("Failed to read FASTA file: {}", e),
            })? as u64;
        if bytes == 0 {
            break;
        }
        let line_start = offset;
        offset += bytes;

        if let Some(header) = line.strip_prefix(b">") {
            if let Some(done) = current.replace(RecordScan::new(header, offset)) {
                add_entry(&mut index, done.entry)?;
            }
            continue;
        }

        // Text before the first header is not part of any sequence
        if let Some(scan) = current.as_mut() {
            let bases = line
                .iter()
                .take_while(|&&b| b != b'\n' && b != b'\r')
                .count() as u64;
            scan.push_line(line_start, bases, bytes)?;
        }
    }

    if let Some(done) = current {
        add_entry(&mut index, done.entry)?;
    }

    Ok(index)
}

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Check for the gzip magic number at the start of a file
fn is_gzip_file(path: &Path) -> Result<bool, FerroError> {
    let mut magic = Vec::with_capacity(GZIP_MAGIC.len());
    File::open(path)
        .and_then(|file| file.take(GZIP_MAGIC.len() as u64).read_to_end(&mut magic))
        .map_err(|e| FerroError::Io {
            msg: format!("Failed to read {}: {}", path.display(), e),
        })?;
    Ok(magic == GZIP_MAGIC)
}
