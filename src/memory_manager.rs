//! Whole-file byte buffers for the binary graph layout.
//!
//! Every integer in the layout is a little-endian `u32`, so the buffers are
//! addressed in 4-byte words and decoded explicitly; nothing here relies on
//! the alignment of the mapping.

use memmap::{Mmap, MmapMut};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

pub const WORD: usize = 4;

/// A read-only memory mapped file.
pub struct MmapFile {
    mmap: Mmap,
}

/// A memory mapped file opened for writing.
///
/// An empty file cannot be mapped, so a one-byte anonymous map stands in for
/// it and `len` remembers the real size.
pub struct MmapMutFile {
    mmap: MmapMut,
    len: usize,
}

impl MmapMutFile {
    fn create<P: AsRef<Path>>(path: P, len: usize) -> io::Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        file.set_len(len as u64)?;
        let mmap = if len == 0 {
            MmapMut::map_anon(1)?
        } else {
            unsafe { MmapMut::map_mut(&file)? }
        };
        Ok(Self { mmap, len })
    }
}

/// A memory manager to hide the underlying type of the memory buffer.
pub enum MemoryManager {
    /// A memory buffer.
    Mem(Vec<u8>),
    /// A read-only memory mapped buffer.
    Mmap(MmapFile),
    /// A writable memory mapped buffer.
    MmapMut(MmapMutFile),
}

impl MemoryManager {
    pub fn new_mem(size: usize) -> Self {
        MemoryManager::Mem(vec![0; size])
    }

    /// Maps the whole file read-only.
    pub fn new_mmap<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(MemoryManager::Mem(vec![]));
        }
        Ok(MemoryManager::Mmap(MmapFile {
            mmap: unsafe { Mmap::map(&file)? },
        }))
    }

    /// Creates (or truncates) the file with `size` bytes and maps it.
    pub fn new_mmap_mut<P: AsRef<Path>>(path: P, size: usize) -> io::Result<Self> {
        Ok(MemoryManager::MmapMut(MmapMutFile::create(path, size)?))
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            MemoryManager::Mem(vec) => &vec[..],
            MemoryManager::Mmap(mmapfile) => &mmapfile.mmap[..],
            MemoryManager::MmapMut(mmapfile) => &mmapfile.mmap[..mmapfile.len],
        }
    }

    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        match self {
            MemoryManager::Mem(vec) => &mut vec[..],
            MemoryManager::Mmap(_) => unimplemented!(),
            MemoryManager::MmapMut(mmapfile) => &mut mmapfile.mmap[..mmapfile.len],
        }
    }

    /// Reads the `index`-th word.
    ///
    /// # Panics
    ///
    /// Panics if the word lies outside the buffer.
    pub fn word(&self, index: usize) -> u32 {
        let pos = index * WORD;
        let mut buf = [0; WORD];
        buf.copy_from_slice(&self.as_bytes()[pos..pos + WORD]);
        u32::from_le_bytes(buf)
    }

    /// Iterates over `count` words starting at word `start`.
    pub fn words(&self, start: usize, count: usize) -> impl ExactSizeIterator<Item = u32> + '_ {
        self.as_bytes()[start * WORD..(start + count) * WORD]
            .chunks_exact(WORD)
            .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
    }

    /// Writes `src` starting at word `start`, returning the word after the last one written.
    pub fn write_words<I>(&mut self, start: usize, src: I) -> usize
    where
        I: IntoIterator<Item = u32>,
    {
        let mut pos = start * WORD;
        let bytes = self.as_mut_bytes();
        for word in src {
            bytes[pos..pos + WORD].copy_from_slice(&word.to_le_bytes());
            pos += WORD;
        }
        pos / WORD
    }

    /// Flushes outstanding writes of a mapped file to disk.
    pub fn flush(&self) -> io::Result<()> {
        match self {
            MemoryManager::MmapMut(mmapfile) if mmapfile.len > 0 => mmapfile.mmap.flush(),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_mem_words() {
        let mut mm = MemoryManager::new_mem(3 * WORD);
        assert_eq!(mm.len(), 3 * WORD);
        assert_eq!(mm.write_words(1, vec![7, 0x0102_0304]), 3);
        assert_eq!(mm.as_bytes()[8..], [4, 3, 2, 1]);
        assert_eq!(mm.word(1), 7);
        assert_eq!(mm.words(0, 3).collect::<Vec<_>>(), [0, 7, 0x0102_0304]);
    }

    #[test]
    fn test_mmap() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[3, 0, 0, 0, 2, 0, 0, 0, 1]).unwrap();
        let path = file.into_temp_path();
        let mm = MemoryManager::new_mmap(&path).unwrap();
        assert_eq!(mm.len(), 9);
        assert_eq!(mm.words(0, 2).collect::<Vec<_>>(), [3, 2]);
    }

    #[test]
    fn test_mmap_empty() {
        let path = NamedTempFile::new().unwrap().into_temp_path();
        let mm = MemoryManager::new_mmap(&path).unwrap();
        assert!(mm.is_empty());
        assert_eq!(mm.words(0, 0).count(), 0);
    }

    #[test]
    fn test_mmap_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(MemoryManager::new_mmap(dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_mmap_mut() {
        let path = NamedTempFile::new().unwrap().into_temp_path();
        let mut mm = MemoryManager::new_mmap_mut(&path, 2 * WORD).unwrap();
        assert_eq!(mm.words(0, 2).collect::<Vec<_>>(), [0, 0]);
        mm.write_words(0, vec![3, 1]);
        mm.flush().unwrap();
        drop(mm);
        assert_eq!(std::fs::read(&path).unwrap(), [3, 0, 0, 0, 1, 0, 0, 0]);
    }

    #[test]
    fn test_mmap_mut_empty() {
        let path = NamedTempFile::new().unwrap().into_temp_path();
        let mm = MemoryManager::new_mmap_mut(&path, 0).unwrap();
        assert!(mm.is_empty());
        mm.flush().unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);
    }
}
