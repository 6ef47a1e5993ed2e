//! Byte regions backing struct overlays.
//!
//! A [`Region`] is an addressable span of bytes with a byte order fixed at
//! construction. Storage is either owned heap bytes (including bytes handed
//! over by the caller, e.g. a datagram buffer) or a memory mapping. Only
//! mapped regions expose a native address; owned regions are the
//! unsupported path for [`crate::Layout::address`].
//!
//! All byte access near the end of a region is bounds-tolerant: reads past
//! the real end yield zero and writes past it are dropped. This is what lets
//! the 8-byte-window bit codec address fields close to the end of a short
//! region without faulting.

use std::fs::OpenOptions;
use std::path::Path;

use memmap2::{MmapMut, MmapOptions};
use serde::{Deserialize, Serialize};

use crate::error::{Result, StruktError};

/// Byte order of multi-byte values in a region.
///
/// The default for layouts is network order (big-endian).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ByteOrder {
    BigEndian,
    LittleEndian,
}

#[derive(Debug)]
enum Storage {
    /// Heap bytes, owned by the region
    Owned(Vec<u8>),
    /// Memory mapping (file-backed or anonymous)
    Mapped {
        mmap: MmapMut,
        _file: Option<std::fs::File>,
    },
}

/// Addressable byte storage with a declared byte order.
#[derive(Debug)]
pub struct Region {
    storage: Storage,
    order: ByteOrder,
}

impl Region {
    /// Allocate an owned, zero-filled region of `len` bytes.
    pub fn alloc(len: usize, order: ByteOrder) -> Self {
        Self {
            storage: Storage::Owned(vec![0u8; len]),
            order,
        }
    }

    /// Wrap caller-supplied bytes (e.g. a datagram buffer).
    pub fn from_vec(bytes: Vec<u8>, order: ByteOrder) -> Self {
        Self {
            storage: Storage::Owned(bytes),
            order,
        }
    }

    /// Create or open a file-backed memory mapping of `len` bytes.
    pub fn map_file(path: impl AsRef<Path>, len: usize, order: ByteOrder) -> Result<Self> {
        if len == 0 {
            return Err(StruktError::invalid_parameter(
                "len",
                "Region size must be greater than 0",
            ));
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path.as_ref())
            .map_err(|e| StruktError::from_io(e, "Failed to create/open file"))?;
        file.set_len(len as u64)
            .map_err(|e| StruktError::from_io(e, "Failed to set file size"))?;
        let mmap = unsafe {
            MmapOptions::new()
                .len(len)
                .map_mut(&file)
                .map_err(|e| StruktError::from_io(e, "Failed to create memory mapping"))?
        };
        Ok(Self {
            storage: Storage::Mapped {
                mmap,
                _file: Some(file),
            },
            order,
        })
    }

    /// Create an anonymous memory mapping of `len` bytes.
    pub fn map_anon(len: usize, order: ByteOrder) -> Result<Self> {
        if len == 0 {
            return Err(StruktError::invalid_parameter(
                "len",
                "Region size must be greater than 0",
            ));
        }
        let mmap = MmapOptions::new()
            .len(len)
            .map_anon()
            .map_err(|e| StruktError::from_io(e, "Failed to create anonymous mapping"))?;
        Ok(Self {
            storage: Storage::Mapped { mmap, _file: None },
            order,
        })
    }

    /// Byte order of multi-byte values in this region
    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Capacity in bytes
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw bytes (read-only)
    pub fn as_slice(&self) -> &[u8] {
        match &self.storage {
            Storage::Owned(bytes) => bytes,
            Storage::Mapped { mmap, .. } => mmap,
        }
    }

    /// Raw bytes (mutable)
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match &mut self.storage {
            Storage::Owned(bytes) => bytes,
            Storage::Mapped { mmap, .. } => mmap,
        }
    }

    /// Native address of the first byte, for region kinds that have one.
    ///
    /// Owned regions return `None`: their storage may move and must not be
    /// referenced from other structs. This is the capability behind
    /// [`crate::Layout::address`].
    pub fn native_address(&self) -> Option<usize> {
        match &self.storage {
            Storage::Owned(_) => None,
            Storage::Mapped { mmap, .. } => Some(mmap.as_ptr() as usize),
        }
    }

    /// Load `N` bytes starting at `index`; bytes past the end read as zero.
    pub(crate) fn load<const N: usize>(&self, index: usize) -> [u8; N] {
        let bytes = self.as_slice();
        let mut out = [0u8; N];
        if index < bytes.len() {
            let n = N.min(bytes.len() - index);
            out[..n].copy_from_slice(&bytes[index..index + n]);
        }
        out
    }

    /// Store bytes starting at `index`; bytes past the end are dropped.
    pub(crate) fn store(&mut self, index: usize, src: &[u8]) {
        let bytes = self.as_mut_slice();
        if index < bytes.len() {
            let n = src.len().min(bytes.len() - index);
            bytes[index..index + n].copy_from_slice(&src[..n]);
        }
    }

    pub(crate) fn get_u8(&self, index: usize) -> u8 {
        let [b] = self.load::<1>(index);
        b
    }

    pub(crate) fn put_u8(&mut self, index: usize, value: u8) {
        self.store(index, &[value]);
    }

    pub(crate) fn get_u16(&self, index: usize) -> u16 {
        let bytes = self.load::<2>(index);
        match self.order {
            ByteOrder::BigEndian => u16::from_be_bytes(bytes),
            ByteOrder::LittleEndian => u16::from_le_bytes(bytes),
        }
    }

    pub(crate) fn put_u16(&mut self, index: usize, value: u16) {
        let bytes = match self.order {
            ByteOrder::BigEndian => value.to_be_bytes(),
            ByteOrder::LittleEndian => value.to_le_bytes(),
        };
        self.store(index, &bytes);
    }

    pub(crate) fn get_u32(&self, index: usize) -> u32 {
        let bytes = self.load::<4>(index);
        match self.order {
            ByteOrder::BigEndian => u32::from_be_bytes(bytes),
            ByteOrder::LittleEndian => u32::from_le_bytes(bytes),
        }
    }

    pub(crate) fn put_u32(&mut self, index: usize, value: u32) {
        let bytes = match self.order {
            ByteOrder::BigEndian => value.to_be_bytes(),
            ByteOrder::LittleEndian => value.to_le_bytes(),
        };
        self.store(index, &bytes);
    }

    pub(crate) fn get_u64(&self, index: usize) -> u64 {
        let bytes = self.load::<8>(index);
        match self.order {
            ByteOrder::BigEndian => u64::from_be_bytes(bytes),
            ByteOrder::LittleEndian => u64::from_le_bytes(bytes),
        }
    }

    pub(crate) fn put_u64(&mut self, index: usize, value: u64) {
        let bytes = match self.order {
            ByteOrder::BigEndian => value.to_be_bytes(),
            ByteOrder::LittleEndian => value.to_le_bytes(),
        };
        self.store(index, &bytes);
    }
}
