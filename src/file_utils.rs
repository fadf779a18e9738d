use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

// @module: Naming convention and local staging helpers

/// Marker appended to the base name of every published translation.
///
/// The marker does double duty: it names outputs, and its presence in a
/// source item's name means the item is itself a translation artifact and
/// must never be selected for translation again. Without that check the
/// pipeline would translate its own output forever if the destination folder
/// were ever fed back in as a source.
pub const TRANSLATED_SUFFIX: &str = "_AT_Translated";

/// Check whether a name carries the translation marker.
///
/// Detection is an exact substring match, which covers both the canonical
/// placement (`notes_AT_Translated.txt`) and bare suffixed names.
pub fn has_translation_suffix(name: &str) -> bool {
    name.contains(TRANSLATED_SUFFIX)
}

/// Strip every occurrence of the translation marker from a name.
///
/// `notes_AT_Translated.txt` becomes `notes.txt`, which is the key used to
/// match a destination artifact back to its source item.
pub fn base_name(name: &str) -> String {
    name.replace(TRANSLATED_SUFFIX, "")
}

/// Split a file name into stem and extension, keeping the dot on the
/// extension side. Names without a dot get an empty extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        // A leading dot is part of the stem (".env" has no extension)
        Some(0) | None => (name, ""),
        Some(idx) => (&name[..idx], &name[idx..]),
    }
}

/// Derive the published artifact name for a source item:
/// `{stem}{TRANSLATED_SUFFIX}{extension}`.
pub fn translated_name(name: &str) -> String {
    let (stem, extension) = split_extension(name);
    format!("{}{}{}", stem, TRANSLATED_SUFFIX, extension)
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write bytes to a file, creating the parent directory if needed
    pub fn write_bytes<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Stage downloaded bytes under the staging directory and return the
    /// local path. Items are staged before processing so a failed
    /// translation leaves an inspectable copy behind.
    pub fn stage_download<P: AsRef<Path>>(staging_dir: P, name: &str, content: &[u8]) -> Result<PathBuf> {
        let staging_dir = staging_dir.as_ref();
        Self::ensure_dir(staging_dir)?;

        let path = staging_dir.join(name);
        Self::write_bytes(&path, content)?;
        Ok(path)
    }
}
