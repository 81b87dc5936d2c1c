//! Sedge CLI binary.
//!
//! Maintains a file-backed index: feed it JSON-lines documents, then
//! search, delete, and inspect from the command line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use sedge::document::{Document, FieldValue};
use sedge::error::{Result, SedgeError};
use sedge::index::InvertedIndex;
use sedge::query::Query;
use sedge::storage::{FileStorage, Storage, StorageConfig};

#[derive(Parser)]
#[command(name = "sedge", version, about = "A lightweight full-text search index")]
struct Cli {
    /// Storage directory
    #[arg(short, long, default_value = "./sedge-data", env = "SEDGE_DIR")]
    dir: PathBuf,

    /// Index name
    #[arg(short, long, default_value = "default")]
    index: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Index documents from a JSON-lines file (one object per line)
    Index {
        /// Path to the JSONL file
        file: PathBuf,
    },
    /// Search one field for a word or phrase
    Search {
        /// Field to search
        field: String,
        /// Query text; multiple words are matched as an exact phrase
        query: String,
    },
    /// Delete a document by id
    Delete {
        /// Document id
        doc_id: u64,
    },
    /// Print index statistics
    Stats,
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let storage: Arc<dyn Storage> =
        Arc::new(FileStorage::open(&cli.dir, StorageConfig::default())?);
    let index = InvertedIndex::open(storage, &cli.index)?;

    match cli.command {
        Command::Index { file } => index_file(&index, &file)?,
        Command::Search { field, query } => search(&index, &field, &query)?,
        Command::Delete { doc_id } => {
            index.delete_document(doc_id)?;
            println!("deleted document {doc_id}");
        }
        Command::Stats => {
            println!("index:     {}", index.name());
            println!("documents: {}", index.doc_count()?);
        }
    }

    index.storage().sync()
}

fn index_file(index: &InvertedIndex, path: &Path) -> Result<()> {
    let reader = BufReader::new(File::open(path)?);

    let mut indexed = 0u64;
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let value: serde_json::Value = serde_json::from_str(&line)?;
        let doc = json_to_document(value).map_err(|e| {
            SedgeError::validation(format!("{}:{}: {e}", path.display(), line_no + 1))
        })?;

        let doc_id = index.add_document(&doc)?;
        println!("indexed document {doc_id}");
        indexed += 1;
    }

    println!("{indexed} documents indexed into {:?}", index.name());
    Ok(())
}

fn json_to_document(value: serde_json::Value) -> Result<Document> {
    let serde_json::Value::Object(fields) = value else {
        return Err(SedgeError::validation("line is not a JSON object"));
    };

    let mut doc = Document::new();
    for (name, value) in fields {
        let field = match value {
            serde_json::Value::String(s) => FieldValue::Text(s),
            serde_json::Value::Bool(b) => FieldValue::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => FieldValue::Float(n.as_f64().ok_or_else(|| {
                    SedgeError::validation(format!("field {name:?} has a non-finite number"))
                })?),
            },
            other => {
                return Err(SedgeError::validation(format!(
                    "field {name:?} has unsupported type: {other}"
                )));
            }
        };
        doc.add_field(name, field);
    }
    Ok(doc)
}

fn search(index: &InvertedIndex, field: &str, query_text: &str) -> Result<()> {
    let query = if query_text.split_whitespace().nth(1).is_some() {
        Query::phrase(field, query_text)
    } else {
        Query::term(field, query_text)
    };

    let hits = index.search(&query)?;
    for hit in &hits {
        let doc = index.get_document(hit.doc_id)?;
        let preview = doc
            .get_field(field)
            .map(|value| value.to_string())
            .unwrap_or_default();
        println!("{}\t{:?}\t{preview}", hit.doc_id, hit.positions);
    }
    println!("{} hits", hits.len());
    Ok(())
}
