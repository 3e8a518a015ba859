use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    errors::LedgerError,
    ledger::{sample_subscriptions, Subscription},
};

use super::paths;
use super::{Result, SubscriptionStore};

const TMP_SUFFIX: &str = "tmp";

/// File-backed store keeping the subscription list as one pretty-printed
/// JSON array, written atomically through a sibling temp file.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    base: PathBuf,
    file: PathBuf,
}

/// What the startup read produced.
///
/// `started` is true only when a valid save existed; sample fallbacks leave
/// the user in front of the landing view.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub subscriptions: Vec<Subscription>,
    pub started: bool,
}

impl JsonStorage {
    pub fn new(base: Option<PathBuf>) -> Result<Self> {
        let base = base.unwrap_or_else(paths::app_data_dir);
        ensure_dir(&base)?;
        let file = paths::subscriptions_file_in(&base);
        Ok(Self { base, file })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn file_path(&self) -> &Path {
        &self.file
    }

    /// Startup read. A missing or unreadable save silently yields the
    /// built-in sample set; the failure is only logged.
    pub fn load_or_sample(&self) -> LoadOutcome {
        if !self.file.exists() {
            tracing::debug!(path = %self.file.display(), "no saved subscriptions, using sample data");
            return LoadOutcome {
                subscriptions: sample_subscriptions(),
                started: false,
            };
        }
        match self.load() {
            Ok(subscriptions) => LoadOutcome {
                subscriptions,
                started: true,
            },
            Err(err) => {
                tracing::warn!(
                    path = %self.file.display(),
                    error = %err,
                    "saved subscriptions unreadable, falling back to sample data"
                );
                LoadOutcome {
                    subscriptions: sample_subscriptions(),
                    started: false,
                }
            }
        }
    }
}

impl SubscriptionStore for JsonStorage {
    fn save(&self, subscriptions: &[Subscription]) -> Result<()> {
        let json = serde_json::to_string_pretty(subscriptions)?;
        let tmp = tmp_path(&self.file);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.file)?;
        tracing::debug!(count = subscriptions.len(), "subscriptions saved");
        Ok(())
    }

    fn load(&self) -> Result<Vec<Subscription>> {
        let data = fs::read_to_string(&self.file)?;
        let subscriptions: Vec<Subscription> = serde_json::from_str(&data)?;
        Ok(subscriptions)
    }
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

pub(crate) fn write_atomic(path: &Path, data: &str) -> std::result::Result<(), LedgerError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
