//! Read-only file mappings.
//!
//! On unix the file is mapped with `mmap(PROT_READ, MAP_PRIVATE)`, so a loaded
//! graph borrows the page cache directly. Elsewhere the file is read into an
//! 8-byte aligned heap buffer, which keeps the zero-copy casts valid.

use std::fs::File;
use std::io;

/// A read-only view of a whole file.
pub(crate) struct Mapping {
    inner: imp::Inner,
}

impl Mapping {
    /// Maps `file` in its entirety.
    pub(crate) fn open(file: &File) -> io::Result<Self> {
        let len = usize::try_from(file.metadata()?.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "file too large to map"))?;
        Ok(Self {
            inner: imp::Inner::map(file, len)?,
        })
    }

    /// The mapped bytes.
    #[inline]
    pub(crate) fn as_slice(&self) -> &[u8] {
        self.inner.as_slice()
    }
}

#[cfg(unix)]
mod imp {
    use std::fs::File;
    use std::io;
    use std::os::unix::io::AsRawFd;
    use std::ptr::NonNull;

    use libc::{c_void, mmap, munmap, MAP_FAILED, MAP_PRIVATE, PROT_READ};

    pub(super) struct Inner {
        ptr: NonNull<u8>,
        len: usize,
    }

    // SAFETY: the mapping is read-only and owned exclusively by `Inner`.
    unsafe impl Send for Inner {}
    unsafe impl Sync for Inner {}

    impl Inner {
        pub(super) fn map(file: &File, len: usize) -> io::Result<Self> {
            if len == 0 {
                // mmap rejects empty lengths.
                return Ok(Self {
                    ptr: NonNull::dangling(),
                    len: 0,
                });
            }
            // SAFETY: a fresh private read-only mapping of a valid descriptor.
            let ptr = unsafe {
                mmap(
                    core::ptr::null_mut(),
                    len,
                    PROT_READ,
                    MAP_PRIVATE,
                    file.as_raw_fd(),
                    0,
                )
            };
            if ptr == MAP_FAILED {
                return Err(io::Error::last_os_error());
            }
            NonNull::new(ptr.cast::<u8>())
                .map(|ptr| Self { ptr, len })
                .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "mmap returned null"))
        }

        #[inline]
        pub(super) fn as_slice(&self) -> &[u8] {
            // SAFETY: `ptr` is valid for `len` readable bytes for the lifetime of
            // the mapping (or dangling with `len == 0`).
            unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
        }
    }

    impl Drop for Inner {
        fn drop(&mut self) {
            if self.len != 0 {
                // SAFETY: unmapping exactly the region returned by `mmap`.
                unsafe {
                    munmap(self.ptr.as_ptr().cast::<c_void>(), self.len);
                }
            }
        }
    }
}

#[cfg(not(unix))]
mod imp {
    use std::fs::File;
    use std::io::{self, Read};

    pub(super) struct Inner {
        words: Vec<u64>,
        len: usize,
    }

    impl Inner {
        pub(super) fn map(file: &File, len: usize) -> io::Result<Self> {
            let mut words = vec![0u64; len.div_ceil(8)];
            let bytes = zerocopy::AsBytes::as_bytes_mut(words.as_mut_slice());
            (&*file).read_exact(&mut bytes[..len])?;
            Ok(Self { words, len })
        }

        #[inline]
        pub(super) fn as_slice(&self) -> &[u8] {
            &zerocopy::AsBytes::as_bytes(self.words.as_slice())[..self.len]
        }
    }
}
