use crate::consts::{is_legal_cap, CAP_SET, KEY_COUNT};
use crate::core_types::Cap;
use crate::error::{LayoptError, LpResult};
use std::fs;
use std::path::Path;

/// Cap standing in for a word boundary in pair records.
pub const BREAK: Cap = b' ';

/// Records beyond this are ignored; the tables are sorted by frequency so
/// the tail carries almost no weight.
const MAX_RECORDS: usize = 2000;

/// Single-character usage frequencies for one language, validated at load:
/// every frequency must be plausible and they must sum to ~1.0.
#[derive(Debug, Clone)]
pub struct CharFreqData {
    /// Indexed like `CAP_SET`.
    pub(crate) freqs: [f64; KEY_COUNT],
}

impl CharFreqData {
    pub fn load<P: AsRef<Path>>(path: P) -> LpResult<Self> {
        let doc = fs::read_to_string(&path)?;
        Self::from_csv(&doc, &path.as_ref().display().to_string())
    }

    /// Parses CSV rows `c,f`. Lowercase caps are accepted and folded.
    pub fn from_csv(doc: &str, origin: &str) -> LpResult<Self> {
        let mut freqs = [0.0; KEY_COUNT];
        let mut rdr = csv::Reader::from_reader(doc.as_bytes());
        for (i, row) in rdr.records().enumerate() {
            let row = row?;
            let line = i + 2;
            if row.len() < 2 {
                return Err(record_err(origin, line, "expected 2 fields `c,f`"));
            }
            let cap = parse_cap(&row[0], origin, line)?;
            let freq = parse_freq(&row[1], origin, line)?;
            if freq < 1e-5 || freq > 0.15 {
                return Err(record_err(
                    origin,
                    line,
                    &format!("frequency {freq} out of range (1e-5, 0.15]"),
                ));
            }
            freqs[cap_index(cap)] = freq;
        }
        let sum: f64 = freqs.iter().sum();
        if (sum - 1.0).abs() > 1e-3 {
            return Err(LayoptError::Data(format!(
                "{origin}: bad frequency sum, expect 1.0, got {sum:.4}"
            )));
        }
        Ok(Self { freqs })
    }

    #[inline(always)]
    pub fn freq_of_index(&self, i: usize) -> f64 {
        self.freqs[i]
    }
}

/// One ordered keystroke pair; either side may be a word boundary.
#[derive(Debug, Clone, Copy)]
pub struct PairRecord {
    pub src: Cap,
    pub dst: Cap,
    pub freq: f64,
}

/// Ordered character-pair frequencies for one language, sorted by
/// descending frequency.
#[derive(Debug, Clone)]
pub struct PairFreqData {
    pub(crate) records: Vec<PairRecord>,
}

impl PairFreqData {
    pub fn load<P: AsRef<Path>>(path: P) -> LpResult<Self> {
        let doc = fs::read_to_string(&path)?;
        Self::from_csv(&doc, &path.as_ref().display().to_string())
    }

    /// Parses CSV rows `c1,c2,f`; `_` (or a literal space) marks a word
    /// boundary on either side.
    pub fn from_csv(doc: &str, origin: &str) -> LpResult<Self> {
        let mut records = Vec::new();
        let mut rdr = csv::Reader::from_reader(doc.as_bytes());
        for (i, row) in rdr.records().enumerate() {
            if records.len() >= MAX_RECORDS {
                break;
            }
            let row = row?;
            let line = i + 2;
            if row.len() < 3 {
                return Err(record_err(origin, line, "expected 3 fields `c1,c2,f`"));
            }
            let src = parse_cap_or_break(&row[0], origin, line)?;
            let dst = parse_cap_or_break(&row[1], origin, line)?;
            let freq = parse_freq(&row[2], origin, line)?;
            check_gram_freq(freq, origin, line)?;
            records.push(PairRecord { src, dst, freq });
        }
        records.sort_by(|a, b| b.freq.total_cmp(&a.freq));
        Ok(Self { records })
    }

    pub fn records(&self) -> &[PairRecord] {
        &self.records
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Ngram<const N: usize> {
    pub caps: [Cap; N],
    pub freq: f64,
}

pub type Bigram = Ngram<2>;
pub type Trigram = Ngram<3>;

/// 2-gram and 3-gram frequencies for one language, each table sorted by
/// descending frequency.
#[derive(Debug, Clone)]
pub struct SeqFreqData {
    pub(crate) bigrams: Vec<Bigram>,
    pub(crate) trigrams: Vec<Trigram>,
}

impl SeqFreqData {
    pub fn load<P: AsRef<Path>>(bigram_path: P, trigram_path: P) -> LpResult<Self> {
        let bi_doc = fs::read_to_string(&bigram_path)?;
        let tri_doc = fs::read_to_string(&trigram_path)?;
        Self::from_csv(
            &bi_doc,
            &bigram_path.as_ref().display().to_string(),
            &tri_doc,
            &trigram_path.as_ref().display().to_string(),
        )
    }

    /// Parses 2-gram rows `c1,c2,f` and 3-gram rows `c1,c2,c3,f`.
    pub fn from_csv(
        bigram_doc: &str,
        bigram_origin: &str,
        trigram_doc: &str,
        trigram_origin: &str,
    ) -> LpResult<Self> {
        let mut bigrams: Vec<Bigram> = parse_ngrams(bigram_doc, bigram_origin)?;
        let mut trigrams: Vec<Trigram> = parse_ngrams(trigram_doc, trigram_origin)?;
        bigrams.sort_by(|a, b| b.freq.total_cmp(&a.freq));
        trigrams.sort_by(|a, b| b.freq.total_cmp(&a.freq));
        Ok(Self { bigrams, trigrams })
    }

    pub fn bigrams(&self) -> &[Bigram] {
        &self.bigrams
    }

    pub fn trigrams(&self) -> &[Trigram] {
        &self.trigrams
    }
}

fn parse_ngrams<const N: usize>(doc: &str, origin: &str) -> LpResult<Vec<Ngram<N>>> {
    let mut records = Vec::new();
    let mut rdr = csv::Reader::from_reader(doc.as_bytes());
    for (i, row) in rdr.records().enumerate() {
        if records.len() >= MAX_RECORDS {
            break;
        }
        let row = row?;
        let line = i + 2;
        if row.len() < N + 1 {
            return Err(record_err(
                origin,
                line,
                &format!("expected {} fields", N + 1),
            ));
        }
        let mut caps = [0u8; N];
        for (j, cap) in caps.iter_mut().enumerate() {
            *cap = parse_cap(&row[j], origin, line)?;
        }
        let freq = parse_freq(&row[N], origin, line)?;
        check_gram_freq(freq, origin, line)?;
        records.push(Ngram { caps, freq });
    }
    Ok(records)
}

fn cap_index(cap: Cap) -> usize {
    CAP_SET.iter().position(|&c| c == cap).unwrap_or(0)
}

fn parse_cap(field: &str, origin: &str, line: usize) -> LpResult<Cap> {
    if field.len() != 1 {
        return Err(record_err(
            origin,
            line,
            &format!("key code \"{field}\" should be a single character"),
        ));
    }
    let cap = field.as_bytes()[0].to_ascii_uppercase();
    if !is_legal_cap(cap) {
        return Err(record_err(
            origin,
            line,
            &format!("'{}' is not a legal key code", field),
        ));
    }
    Ok(cap)
}

fn parse_cap_or_break(field: &str, origin: &str, line: usize) -> LpResult<Cap> {
    if field == "_" || field == " " {
        return Ok(BREAK);
    }
    parse_cap(field, origin, line)
}

fn parse_freq(field: &str, origin: &str, line: usize) -> LpResult<f64> {
    field
        .trim()
        .parse::<f64>()
        .map_err(|_| record_err(origin, line, &format!("\"{field}\" is not a number")))
}

fn check_gram_freq(freq: f64, origin: &str, line: usize) -> LpResult<()> {
    if freq < 1e-5 || freq > 0.05 {
        return Err(record_err(
            origin,
            line,
            &format!("frequency {freq} out of range (1e-5, 0.05)"),
        ));
    }
    Ok(())
}

fn record_err(origin: &str, line: usize, msg: &str) -> LayoptError {
    LayoptError::Data(format!("{origin}: record at line {line}: {msg}"))
}
