use crate::error::{Error, Result};
use crate::types::symbol::Symbol;
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tokio::sync::watch;
use tracing::{info, warn};

/// File-backed watch-list of ticker symbols.
///
/// The in-memory set and the persisted file move together: a mutation first
/// rewrites the file (sorted, newline-delimited, no trailing metadata) and only
/// commits to memory once the write succeeded, so a failed write never leaves
/// memory diverged from disk.
///
/// Mutations may arrive concurrently with an in-flight poll cycle; the cycle
/// works from the symbol list captured at its start, so a mutation takes
/// effect on the next cycle.
pub struct SymbolRegistry {
    path: PathBuf,
    symbols: RwLock<BTreeSet<Symbol>>,
    changed_tx: watch::Sender<u64>,
}

impl SymbolRegistry {
    /// Load the registry from `path`, creating an empty file if none exists.
    ///
    /// An unreadable or uncreatable path is the one unrecoverable condition in
    /// the pipeline and fails startup.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                std::fs::write(&path, "")?;
                info!("Created empty symbol registry at {}", path.display());
                String::new()
            }
            Err(e) => return Err(e.into()),
        };

        let mut symbols = BTreeSet::new();
        for line in raw.lines() {
            if line.trim().is_empty() {
                continue;
            }
            match Symbol::parse(line) {
                Ok(symbol) => {
                    symbols.insert(symbol);
                }
                Err(_) => {
                    warn!("Skipping invalid registry line: {:?}", line);
                }
            }
        }

        info!(
            "Loaded {} symbols from registry {}",
            symbols.len(),
            path.display()
        );

        let (changed_tx, _) = watch::channel(0u64);
        Ok(SymbolRegistry {
            path,
            symbols: RwLock::new(symbols),
            changed_tx,
        })
    }

    /// Current symbols, sorted and duplicate-free.
    pub fn list(&self) -> Result<Vec<Symbol>> {
        let symbols = self
            .symbols
            .read()
            .map_err(|_| Error::PersistenceError("registry lock poisoned".to_string()))?;
        Ok(symbols.iter().cloned().collect())
    }

    /// Add a symbol. Returns false without touching disk if it already exists.
    pub fn add(&self, raw: &str) -> Result<bool> {
        let symbol = Symbol::parse(raw)?;

        let mut symbols = self
            .symbols
            .write()
            .map_err(|_| Error::PersistenceError("registry lock poisoned".to_string()))?;

        if symbols.contains(&symbol) {
            return Ok(false);
        }

        let mut updated = symbols.clone();
        updated.insert(symbol.clone());
        self.persist(&updated)?;

        *symbols = updated;
        drop(symbols);

        info!("Added symbol {} to registry", symbol);
        self.signal_changed();
        Ok(true)
    }

    /// Remove a symbol. Returns false without touching disk if it is absent.
    pub fn remove(&self, raw: &str) -> Result<bool> {
        let symbol = Symbol::parse(raw)?;

        let mut symbols = self
            .symbols
            .write()
            .map_err(|_| Error::PersistenceError("registry lock poisoned".to_string()))?;

        if !symbols.contains(&symbol) {
            return Ok(false);
        }

        let mut updated = symbols.clone();
        updated.remove(&symbol);
        self.persist(&updated)?;

        *symbols = updated;
        drop(symbols);

        info!("Removed symbol {} from registry", symbol);
        self.signal_changed();
        Ok(true)
    }

    /// Receiver for the registry-changed signal. The value is a generation
    /// counter bumped on every successful mutation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changed_tx.subscribe()
    }

    fn persist(&self, symbols: &BTreeSet<Symbol>) -> Result<()> {
        let lines: Vec<&str> = symbols.iter().map(Symbol::as_str).collect();
        std::fs::write(&self.path, lines.join("\n")).map_err(|e| {
            Error::PersistenceError(format!(
                "failed to write registry {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    fn signal_changed(&self) {
        self.changed_tx.send_modify(|generation| *generation += 1);
    }
}
