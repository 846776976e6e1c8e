use std::fs;
use std::path::PathBuf;

use blake3::Hasher;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::config_directory;
use crate::error::{AppError, AppResult};

const CACHE_FILE_NAME: &str = "reply_cache.json";
const CACHE_LIMIT: usize = 32;

#[derive(Default, Serialize, Deserialize)]
struct CacheFile {
    entries: Vec<CacheEntry>,
}

#[derive(Serialize, Deserialize, Clone)]
struct CacheEntry {
    key: String,
    model: String,
    reply: String,
}

/// Raw model replies keyed by model and ticket text. Replies are cached rather
/// than records so a cache hit still goes through the parser.
pub struct ReplyCache {
    file_path: PathBuf,
    file: CacheFile,
}

impl ReplyCache {
    pub fn load() -> AppResult<Self> {
        Self::load_from(config_directory()?.join(CACHE_FILE_NAME))
    }

    pub fn load_from(path: PathBuf) -> AppResult<Self> {
        let file = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str::<CacheFile>(&contents)
                .map_err(|err| AppError::Configuration(format!("invalid cache file: {err}")))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => CacheFile::default(),
            Err(err) => return Err(AppError::Io(err)),
        };

        Ok(Self {
            file_path: path,
            file,
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.file
            .entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.reply.as_str())
    }

    pub fn insert(&mut self, key: String, model: &str, reply: &str) {
        self.file.entries.retain(|entry| entry.key != key);
        self.file.entries.push(CacheEntry {
            key,
            model: model.to_string(),
            reply: reply.to_string(),
        });

        if self.file.entries.len() > CACHE_LIMIT {
            let overflow = self.file.entries.len() - CACHE_LIMIT;
            self.file.entries.drain(0..overflow);
            debug!(evicted = overflow, "trimmed reply cache");
        }
    }

    pub fn save(&self) -> AppResult<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(&self.file)
            .map_err(|err| AppError::Configuration(format!("failed to write cache: {err}")))?;
        fs::write(&self.file_path, data)?;
        Ok(())
    }

    pub fn compute_key(model: &str, ticket_text: &str) -> String {
        let mut hasher = Hasher::new();
        hasher.update(model.as_bytes());
        hasher.update(&[0]);
        hasher.update(ticket_text.as_bytes());
        hasher.finalize().to_hex().to_string()
    }
}
