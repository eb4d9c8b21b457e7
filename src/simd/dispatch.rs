//! Process-wide dispatch registry.
//!
//! A single atomic cell holds the active [`CapabilityLevel`]. It is filled
//! lazily from [`detect`](super::detect::detect) on first read and can be
//! overridden at any time with [`set_level`]. All accesses use relaxed
//! ordering: readers never see a torn value, but a `set_level` racing with an
//! in-flight kernel call may or may not be observed by it.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;

use super::detect::detect;
use super::CapabilityLevel;

const UNINITIALIZED: u8 = u8::MAX;

static ACTIVE: AtomicU8 = AtomicU8::new(UNINITIALIZED);
static HOST: OnceLock<CapabilityLevel> = OnceLock::new();

/// The level detected for the running host, cached after the first call.
///
/// Independent of [`set_level`]. Builds without SIMD kernels report `None`.
pub fn host_level() -> CapabilityLevel {
    *HOST.get_or_init(|| {
        let level = if super::SIMD_COMPILED {
            detect()
        } else {
            CapabilityLevel::None
        };
        tracing::debug!(%level, simd_compiled = super::SIMD_COMPILED, "detected host capability level");
        level
    })
}

/// The level dispatch points currently route on.
///
/// The first call initializes the registry from [`host_level`] unless a
/// [`set_level`] got there first.
#[inline]
pub fn current_level() -> CapabilityLevel {
    if !super::SIMD_COMPILED {
        return CapabilityLevel::None;
    }

    let raw = ACTIVE.load(Ordering::Relaxed);
    if raw != UNINITIALIZED {
        return CapabilityLevel::from_u8(raw);
    }

    let detected = host_level() as u8;
    match ACTIVE.compare_exchange(UNINITIALIZED, detected, Ordering::Relaxed, Ordering::Relaxed) {
        Ok(_) => CapabilityLevel::from_u8(detected),
        Err(winner) => CapabilityLevel::from_u8(winner),
    }
}

/// Overrides the active level for every thread.
///
/// Any level is accepted. A level the host cannot execute is recorded as
/// requested, but dispatch points route it to the scalar path.
pub fn set_level(level: CapabilityLevel) {
    let previous = ACTIVE.swap(level as u8, Ordering::Relaxed);
    let host = host_level();

    tracing::debug!(
        previous = %CapabilityLevel::from_u8(previous),
        %level,
        "capability level set"
    );
    if !host.supports(level) {
        tracing::warn!(
            %level,
            %host,
            "requested capability level is not supported by this host, dispatch will use scalar kernels"
        );
    }
}

/// Restores the active level to [`host_level`].
pub fn reset_level() {
    set_level(host_level());
}

/// Sets `level` until the returned guard is dropped.
///
/// The guard restores whatever level was active when it was created. It does
/// not serialize concurrent users of the registry.
#[must_use = "the previous level is restored when the guard is dropped"]
pub fn scoped_level(level: CapabilityLevel) -> LevelGuard {
    let previous = current_level();
    set_level(level);
    LevelGuard { previous }
}

/// Restores a previous level on drop. Created by [`scoped_level`].
#[derive(Debug)]
pub struct LevelGuard {
    previous: CapabilityLevel,
}

impl LevelGuard {
    /// The level that will be restored.
    pub fn previous(&self) -> CapabilityLevel {
        self.previous
    }
}

impl Drop for LevelGuard {
    fn drop(&mut self) {
        set_level(self.previous);
    }
}

/// The level a dispatch point should execute for `requested`: the request
/// itself when the host supports it, otherwise `None`.
#[inline(always)]
pub(crate) fn kernel_level(requested: CapabilityLevel) -> CapabilityLevel {
    if host_level().supports(requested) {
        requested
    } else {
        CapabilityLevel::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests in this module mutate the global registry.
    static REGISTRY: Mutex<()> = Mutex::new(());

    #[test]
    fn test_host_level_is_stable() {
        assert_eq!(host_level(), host_level());
        if super::super::SIMD_COMPILED {
            assert_eq!(host_level(), detect());
        }
    }

    #[test]
    fn test_set_and_reset() {
        let _lock = REGISTRY.lock().unwrap_or_else(|e| e.into_inner());

        set_level(CapabilityLevel::None);
        assert_eq!(current_level(), CapabilityLevel::None);

        reset_level();
        assert_eq!(current_level(), host_level());
    }

    #[test]
    fn test_scoped_level_restores_previous() {
        let _lock = REGISTRY.lock().unwrap_or_else(|e| e.into_inner());
        reset_level();

        let before = current_level();
        {
            let guard = scoped_level(CapabilityLevel::None);
            assert_eq!(guard.previous(), before);
            assert_eq!(current_level(), CapabilityLevel::None);
        }
        assert_eq!(current_level(), before);
    }

    #[cfg(any(simd_x86, simd_neon))]
    #[test]
    fn test_unsupported_level_is_recorded_as_requested() {
        let _lock = REGISTRY.lock().unwrap_or_else(|e| e.into_inner());

        let foreign = if host_level() == CapabilityLevel::Neon {
            CapabilityLevel::Avx2
        } else {
            CapabilityLevel::Neon
        };
        let _guard = scoped_level(foreign);
        assert_eq!(current_level(), foreign);
        assert_eq!(kernel_level(foreign), CapabilityLevel::None);
    }

    #[cfg(simd_fallback)]
    #[test]
    fn test_fallback_build_always_reports_none() {
        let _lock = REGISTRY.lock().unwrap_or_else(|e| e.into_inner());

        let _guard = scoped_level(CapabilityLevel::Avx2);
        assert_eq!(current_level(), CapabilityLevel::None);
        assert_eq!(host_level(), CapabilityLevel::None);
    }

    #[test]
    fn test_kernel_level_keeps_supported_levels() {
        let host = host_level();
        for level in CapabilityLevel::ALL {
            let expected = if host.supports(level) {
                level
            } else {
                CapabilityLevel::None
            };
            assert_eq!(kernel_level(level), expected, "requested {level} on {host}");
        }
        assert_eq!(kernel_level(host), host);
    }
}
