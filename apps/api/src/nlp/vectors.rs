//! Word vector tables read from a GloVe / word2vec text file (`word v1 v2 ... vN`
//! per line, an optional `count dims` header line).

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::info;

use crate::nlp::ModelError;

#[derive(Debug, Clone)]
pub struct WordVectors {
    dims: usize,
    table: HashMap<String, Vec<f32>>,
}

impl WordVectors {
    /// Loads a vector file. Any I/O or format problem means the model is unusable.
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let file = File::open(path).map_err(|e| {
            ModelError::ModelUnavailable(format!("cannot open {}: {e}", path.display()))
        })?;
        let vectors = Self::from_reader(BufReader::new(file))?;
        info!(
            path = %path.display(),
            words = vectors.vocabulary_size(),
            dims = vectors.dims(),
            "Loaded word vectors"
        );
        Ok(vectors)
    }

    pub fn from_reader(reader: impl BufRead) -> Result<Self, ModelError> {
        let mut table: HashMap<String, Vec<f32>> = HashMap::new();
        let mut dims: Option<usize> = None;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                ModelError::ModelUnavailable(format!("read error at line {}: {e}", line_no + 1))
            })?;
            let mut fields = line.split_whitespace();
            let Some(word) = fields.next() else {
                continue;
            };
            let rest: Vec<&str> = fields.collect();

            if line_no == 0 && rest.len() == 1 && word.parse::<usize>().is_ok() {
                // word2vec header: "<count> <dims>"
                continue;
            }

            let values = rest
                .iter()
                .map(|v| v.parse::<f32>())
                .collect::<Result<Vec<f32>, _>>()
                .map_err(|e| {
                    ModelError::ModelUnavailable(format!(
                        "invalid vector component at line {}: {e}",
                        line_no + 1
                    ))
                })?;

            if values.is_empty() {
                return Err(ModelError::ModelUnavailable(format!(
                    "missing vector components at line {}",
                    line_no + 1
                )));
            }
            match dims {
                None => dims = Some(values.len()),
                Some(d) if d != values.len() => {
                    return Err(ModelError::ModelUnavailable(format!(
                        "line {} has {} dimensions, expected {d}",
                        line_no + 1,
                        values.len()
                    )));
                }
                Some(_) => {}
            }
            table.insert(word.to_string(), values);
        }

        match dims {
            Some(dims) => Ok(WordVectors { dims, table }),
            None => Err(ModelError::ModelUnavailable(
                "vector file contains no vectors".to_string(),
            )),
        }
    }

    pub fn dims(&self) -> usize {
        self.dims
    }

    pub fn vocabulary_size(&self) -> usize {
        self.table.len()
    }

    /// Vector for a surface word: the exact form, then lowercase.
    /// Out-of-vocabulary words have no vector.
    pub fn lookup(&self, word: &str) -> Option<&[f32]> {
        self.table
            .get(word)
            .or_else(|| self.table.get(&word.to_lowercase()))
            .map(Vec::as_slice)
    }
}
