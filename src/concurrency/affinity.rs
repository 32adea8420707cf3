//! Pinning worker threads to logical cores.
//!
//! Level-synchronous workers spin at every barrier, so a worker migrated onto a
//! busy core stalls the whole level. Pinning keeps one worker per core for the
//! duration of a traversal. Only Linux is supported; elsewhere pinning reports
//! `Unsupported` and callers carry on unpinned.

use std::io;

/// Logical CPUs this process may run on, in ascending order.
#[cfg(target_os = "linux")]
pub fn allowed_cpus() -> io::Result<Vec<usize>> {
    // SAFETY: `cpu_set_t` is plain data; an all-zero value is the empty set and
    // the kernel writes at most `size_of::<cpu_set_t>()` bytes into it.
    unsafe {
        let mut set: libc::cpu_set_t = core::mem::zeroed();
        if libc::sched_getaffinity(0, core::mem::size_of::<libc::cpu_set_t>(), &mut set) != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok((0..libc::CPU_SETSIZE as usize)
            .filter(|&cpu| libc::CPU_ISSET(cpu, &set))
            .collect())
    }
}

/// Logical CPUs this process may run on, in ascending order.
#[cfg(not(target_os = "linux"))]
pub fn allowed_cpus() -> io::Result<Vec<usize>> {
    let n = std::thread::available_parallelism()?.get();
    Ok((0..n).collect())
}

/// Pins the calling thread to the `slot`-th allowed CPU (wrapping around).
#[cfg(target_os = "linux")]
pub fn pin_current_thread(slot: usize) -> io::Result<usize> {
    let cpus = allowed_cpus()?;
    if cpus.is_empty() {
        return Err(io::Error::new(io::ErrorKind::NotFound, "no CPUs in affinity mask"));
    }
    let cpu = cpus[slot % cpus.len()];
    // SAFETY: see `allowed_cpus`; `cpu < CPU_SETSIZE` because it came from the
    // kernel-provided mask.
    unsafe {
        let mut set: libc::cpu_set_t = core::mem::zeroed();
        libc::CPU_SET(cpu, &mut set);
        if libc::sched_setaffinity(0, core::mem::size_of::<libc::cpu_set_t>(), &set) != 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(cpu)
}

/// Pins the calling thread to the `slot`-th allowed CPU (wrapping around).
#[cfg(not(target_os = "linux"))]
pub fn pin_current_thread(_slot: usize) -> io::Result<usize> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "thread pinning is only implemented for Linux",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_cpus_is_sorted_and_non_empty() {
        let cpus = allowed_cpus().unwrap();
        assert!(!cpus.is_empty());
        assert!(cpus.windows(2).all(|w| w[0] < w[1]));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn pinning_lands_on_an_allowed_cpu() {
        let cpus = allowed_cpus().unwrap();
        std::thread::spawn(move || {
            let cpu = pin_current_thread(cpus.len() + 1).unwrap();
            assert!(cpus.contains(&cpu));
        })
        .join()
        .unwrap();
    }
}
