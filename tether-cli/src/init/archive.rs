//! Archive transport
//!
//! Packs generated definitions into a tar archive, pushes it, and writes the
//! canonical archive returned by the control plane back to disk.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tar::{Archive, Builder, EntryType, Header};
use tether_client::{ControlPlane, PushResponse};
use tracing::{debug, info};

use super::generator::{GeneratedFileSet, create_dir, write_file};
use super::{InitError, print_messages};

const ENTRY_MODE: u32 = 0o600;

/// How [`unpack`] treats the destination
#[derive(Debug, Clone, Copy)]
pub struct UnpackOptions {
    /// Replace files that already exist; otherwise they are left untouched
    pub overwrite_existing: bool,
    /// Create the destination directory when missing
    pub create_missing_dirs: bool,
}

impl Default for UnpackOptions {
    fn default() -> Self {
        Self {
            overwrite_existing: true,
            create_missing_dirs: true,
        }
    }
}

/// Packs every file of the set, in order, under its base name
pub fn pack(files: &GeneratedFileSet) -> Result<Vec<u8>, InitError> {
    let failed = |source: io::Error| InitError::ArchiveFailed {
        context: "pack",
        source,
    };

    let mut builder = Builder::new(Vec::new());
    for path in files.paths() {
        let name = path.file_name().ok_or_else(|| {
            failed(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} has no file name", path.display()),
            ))
        })?;
        let content = fs::read(path).map_err(failed)?;

        let mut header = Header::new_ustar();
        header.set_entry_type(EntryType::Regular);
        header.set_size(content.len() as u64);
        header.set_mode(ENTRY_MODE);
        header.set_mtime(0);
        builder
            .append_data(&mut header, name, content.as_slice())
            .map_err(failed)?;
    }

    let archive = builder.into_inner().map_err(failed)?;
    debug!("Packed {} file(s) into {} bytes", files.len(), archive.len());
    Ok(archive)
}

/// Writes every regular entry of `archive` into `dest`
///
/// Entries must be plain relative paths; anything absolute or climbing out of
/// `dest` fails the whole unpack.
///
/// # Returns
/// The paths written, in archive order
pub fn unpack(archive: &[u8], dest: &Path, options: UnpackOptions) -> Result<Vec<PathBuf>, InitError> {
    let failed = |source: io::Error| InitError::ArchiveFailed {
        context: "unpack",
        source,
    };

    if !dest.is_dir() {
        if !options.create_missing_dirs {
            return Err(failed(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} does not exist", dest.display()),
            )));
        }
        create_dir(dest).map_err(failed)?;
    }

    let mut written = Vec::new();
    let mut archive = Archive::new(archive);
    for entry in archive.entries().map_err(failed)? {
        let mut entry = entry.map_err(failed)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let relative = entry.path().map_err(failed)?.into_owned();
        if !is_plain_relative(&relative) {
            return Err(failed(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("refusing to unpack entry {}", relative.display()),
            )));
        }

        let target = dest.join(&relative);
        if target.exists() && !options.overwrite_existing {
            debug!("Keeping existing {}", target.display());
            continue;
        }
        if let Some(parent) = target.parent() {
            create_dir(parent).map_err(failed)?;
        }

        let mut content = Vec::new();
        io::copy(&mut entry, &mut content).map_err(failed)?;
        write_file(&target, &content).map_err(failed)?;
        written.push(target);
    }

    Ok(written)
}

fn is_plain_relative(path: &Path) -> bool {
    path.components().next().is_some()
        && path.components().all(|c| matches!(c, Component::Normal(_)))
}

/// Pushes archives for one project
pub struct ArchiveTransport<'a> {
    client: &'a dyn ControlPlane,
    project_key: &'a str,
}

impl<'a> ArchiveTransport<'a> {
    pub fn new(client: &'a dyn ControlPlane, project_key: &'a str) -> Self {
        Self {
            client,
            project_key,
        }
    }

    /// Uploads `archive` attributed to `origin_url`
    ///
    /// Server messages are printed whether or not the push is accepted.
    pub async fn push(&self, archive: Vec<u8>, origin_url: &str) -> Result<PushResponse, InitError> {
        info!("Pushing {} bytes to project {}", archive.len(), self.project_key);

        match self.client.push_workflow(self.project_key, archive, origin_url).await {
            Ok(response) => {
                print_messages(&response.messages);
                Ok(response)
            }
            Err(e) => {
                print_messages(e.messages());
                Err(InitError::PushRejected { source: e })
            }
        }
    }
}
