//! Process-wide dispatch registry: overrides, configuration and concurrent
//! use.
//!
//! Every test here touches the global level, so they serialize on `LOCK`.

use std::sync::Mutex;

use linmath::simd::{self, CapabilityLevel};
use linmath::{dot4, mat4_mul, mat4_mul_vec, vec3, vec4, Config, Mat4};
use rayon::prelude::*;

static LOCK: Mutex<()> = Mutex::new(());

fn lock() -> std::sync::MutexGuard<'static, ()> {
    LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

#[test]
fn test_first_read_matches_host() {
    let _guard = lock();
    simd::reset_level();
    assert_eq!(simd::current_level(), simd::host_level());
    if simd::SIMD_COMPILED {
        assert_eq!(simd::host_level(), simd::detect());
    } else {
        assert_eq!(simd::current_level(), CapabilityLevel::None);
    }
}

#[test]
fn test_set_level_round_trip() {
    let _guard = lock();

    for level in CapabilityLevel::ALL {
        simd::set_level(level);
        let expected = if simd::SIMD_COMPILED {
            level
        } else {
            CapabilityLevel::None
        };
        assert_eq!(simd::current_level(), expected);
    }
    simd::reset_level();
    assert_eq!(simd::current_level(), simd::host_level());
}

#[test]
fn test_results_do_not_depend_on_level() {
    let _guard = lock();

    let a = Mat4::rotation(&vec3(0.0, 1.0, 1.0), 1.3);
    let b = Mat4::translation(4.0, -1.0, 0.25);
    let v = vec4(1.0, 2.0, 3.0, 1.0);

    let reference = a.scalar_mul(&b);
    for level in CapabilityLevel::ALL {
        let _scoped = simd::scoped_level(level);
        let product = mat4_mul(&a, &b);
        for c in 0..4 {
            for r in 0..4 {
                assert!((product[c][r] - reference[c][r]).abs() < 1e-5, "{level} [{c}][{r}]");
            }
        }
        assert!((dot4(&v, &v) - 15.0).abs() < 1e-5);
        let mapped = mat4_mul_vec(&Mat4::translation(1.0, 1.0, 1.0), &v);
        assert_eq!(mapped, vec4(2.0, 3.0, 4.0, 1.0));
    }
}

#[test]
fn test_config_apply() {
    let _guard = lock();
    simd::reset_level();
    let before = simd::current_level();

    assert_eq!(Config::default().apply(), before);

    let forced = Config {
        level_override: Some(CapabilityLevel::None),
    };
    assert_eq!(forced.apply(), CapabilityLevel::None);
    assert_eq!(simd::current_level(), CapabilityLevel::None);

    simd::reset_level();
}

#[test]
fn test_concurrent_set_level_and_dispatch() {
    let _guard = lock();

    let a = Mat4::rotation_z(0.6) * Mat4::scaling(1.5, 2.0, 0.5);
    let b = Mat4::translation(-2.0, 3.0, 1.0).rotate_x(0.2);
    let v = vec4(0.5, -1.5, 2.5, 1.0);
    let reference = a.scalar_mul(&b);
    let reference_v = a.scalar_mul_vec(&v);
    let reference_dot = v.scalar_dot(&v);

    let mismatches: usize = (0..10_000usize)
        .into_par_iter()
        .map(|i| {
            if i % 7 == 0 {
                simd::set_level(CapabilityLevel::ALL[i % CapabilityLevel::ALL.len()]);
            }

            let product = mat4_mul(&a, &b);
            let mapped = mat4_mul_vec(&a, &v);
            let dot = dot4(&v, &v);

            let mut bad = 0;
            for c in 0..4 {
                for r in 0..4 {
                    if (product[c][r] - reference[c][r]).abs() > 1e-5 {
                        bad += 1;
                    }
                }
                if (mapped[c] - reference_v[c]).abs() > 1e-5 {
                    bad += 1;
                }
            }
            if (dot - reference_dot).abs() > 1e-5 {
                bad += 1;
            }
            bad
        })
        .sum();

    simd::reset_level();
    assert_eq!(mismatches, 0);
}

#[test]
fn test_concurrent_first_reads_agree() {
    let _guard = lock();
    simd::reset_level();

    let levels: Vec<CapabilityLevel> = (0..64)
        .into_par_iter()
        .map(|_| simd::current_level())
        .collect();
    assert!(levels.iter().all(|level| *level == simd::host_level()));
}
