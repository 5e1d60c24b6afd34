//! # Pager
//!
//! Sole owner of the backing file handle. The pager exposes exactly the
//! operations the tree needs: open-or-create, whole-page read, whole-page
//! write, and append-only allocation. Partial page I/O is never exposed.
//!
//! Writes go straight through to the operating system; no user-space
//! buffering sits between a `write_page` call and the OS page cache. `sync`
//! is available for callers that want the file pushed to stable storage, but
//! nothing in the core requires it.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};

use super::{PageBuf, PageId};
use crate::config::PAGE_SIZE;

#[derive(Debug)]
pub struct Pager {
    file: File,
    path: PathBuf,
}

impl Pager {
    /// Opens (or creates) the backing file for read+write. A file shorter
    /// than one page is extended with a zero-filled first page so page 0
    /// always exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .wrap_err_with(|| format!("failed to open index file '{}'", path.display()))?;

        let mut pager = Self { file, path };

        if pager.file_size()? < PAGE_SIZE as u64 {
            pager
                .file
                .seek(SeekFrom::Start(0))
                .wrap_err("failed to seek to start of fresh index file")?;
            pager.file.write_all(&[0u8; PAGE_SIZE]).wrap_err_with(|| {
                format!(
                    "failed to initialize superblock page in '{}'",
                    pager.path.display()
                )
            })?;
        }

        Ok(pager)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current byte length of the backing file.
    pub fn file_size(&self) -> Result<u64> {
        let meta = self
            .file
            .metadata()
            .wrap_err_with(|| format!("failed to stat index file '{}'", self.path.display()))?;
        Ok(meta.len())
    }

    /// Appends a zero-filled page to the file and returns its id (= the
    /// prior file length in pages). Pages are never reclaimed.
    pub fn allocate_page(&mut self) -> Result<PageId> {
        let offset = self
            .file
            .seek(SeekFrom::End(0))
            .wrap_err("allocate_page: seek to end failed")?;
        self.file
            .write_all(&[0u8; PAGE_SIZE])
            .wrap_err("allocate_page: failed to extend file")?;
        Ok(offset / PAGE_SIZE as u64)
    }

    /// Reads exactly one page into `out`. A short read is an error.
    pub fn read_page(&mut self, pid: PageId, out: &mut PageBuf) -> Result<()> {
        self.file
            .seek(SeekFrom::Start(pid * PAGE_SIZE as u64))
            .wrap_err_with(|| format!("read_page: seek to page {} failed", pid))?;
        self.file
            .read_exact(out)
            .wrap_err_with(|| format!("read_page: short read at page {}", pid))
    }

    /// Writes exactly one page from `data`.
    pub fn write_page(&mut self, pid: PageId, data: &PageBuf) -> Result<()> {
        self.file
            .seek(SeekFrom::Start(pid * PAGE_SIZE as u64))
            .wrap_err_with(|| format!("write_page: seek to page {} failed", pid))?;
        self.file
            .write_all(data)
            .wrap_err_with(|| format!("write_page: write at page {} failed", pid))
    }

    /// Flushes file contents to stable storage.
    pub fn sync(&self) -> Result<()> {
        self.file
            .sync_data()
            .wrap_err_with(|| format!("failed to sync index file '{}'", self.path.display()))
    }
}
