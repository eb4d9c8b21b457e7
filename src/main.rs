//! Capability probe: reports the detected and active SIMD levels and checks
//! every level against the scalar reference on this machine.
//!
//! `LINMATH_SIMD_LEVEL` forces the active level; `RUST_LOG` controls logging.
//! Requires the `cli` feature.

use std::process::ExitCode;

use linmath::math::PI_HALF;
use linmath::simd::{self, CapabilityLevel};
use linmath::{dot4_with, mat4_mul_vec_with, mat4_mul_with, vec3, vec4, Config, Mat4, Vec4};
use tracing_subscriber::EnvFilter;

// Relative to the sum of absolute products.
const KERNEL_TOLERANCE: f32 = 1e-5;
const SCENARIO_TOLERANCE: f32 = 1e-2;

fn check(name: &str, ok: bool) -> usize {
    println!("  [{}] {name}", if ok { "ok" } else { "FAIL" });
    usize::from(!ok)
}

fn close(actual: f32, expected: f32, scale: f32, tolerance: f32) -> bool {
    (actual - expected).abs() <= tolerance * scale.max(1.0)
}

fn vec4_close(actual: Vec4, expected: Vec4, tolerance: f32) -> bool {
    (0..4).all(|i| close(actual[i], expected[i], expected[i].abs(), tolerance))
}

fn run_scenario() -> usize {
    println!("scenario:");
    let mut failures = 0;

    let a = vec3(1.0, 2.0, 3.0);
    let b = vec3(4.0, 5.0, 6.0);
    failures += check("dot((1,2,3),(4,5,6)) = 32", a.dot(&b) == 32.0);
    failures += check("cross((1,2,3),(4,5,6)) = (-3,6,-3)", a.cross(&b) == vec3(-3.0, 6.0, -3.0));

    let p = vec4(1.0, 2.0, 3.0, 1.0);
    failures += check("identity * p = p", Mat4::identity() * p == p);
    failures += check(
        "translation(1,2,3) * p = (2,4,6,1)",
        Mat4::translation(1.0, 2.0, 3.0) * p == vec4(2.0, 4.0, 6.0, 1.0),
    );
    failures += check(
        "rotation_x(pi/2) * (0,1,0,1) = (0,0,1,1)",
        vec4_close(
            Mat4::rotation_x(PI_HALF) * vec4(0.0, 1.0, 0.0, 1.0),
            vec4(0.0, 0.0, 1.0, 1.0),
            SCENARIO_TOLERANCE,
        ),
    );

    failures
}

fn check_levels() -> usize {
    let host = simd::host_level();
    let mut failures = 0;

    let a = Mat4::rotation(&vec3(1.0, -2.0, 0.5), 0.9) * Mat4::translation(3.0, -1.0, 2.0);
    let b = Mat4::perspective(1.1, 16.0 / 9.0, 0.1, 100.0) * Mat4::scaling(2.0, 0.5, 3.0);
    let v = vec4(0.25, -4.0, 7.5, 1.0);
    let w = vec4(-3.0, 0.125, 2.0, -1.5);

    let dot_reference = v.scalar_dot(&w);
    let dot_scale = (0..4).map(|i| (v[i] * w[i]).abs()).sum::<f32>();
    let mul_reference = a.scalar_mul(&b);
    let mul_vec_reference = a.scalar_mul_vec(&v);

    for level in CapabilityLevel::ALL {
        let route = if host.supports(level) {
            "native"
        } else {
            "scalar fallback"
        };
        println!("level {level} ({route}):");

        let dot = dot4_with(level, &v, &w);
        failures += check(
            "dot4",
            close(dot, dot_reference, dot_scale, KERNEL_TOLERANCE),
        );

        let product = mat4_mul_with(level, &a, &b);
        let mul_ok = (0..4).all(|c| {
            (0..4).all(|r| {
                let scale = (0..4).map(|k| (a[k][r] * b[c][k]).abs()).sum::<f32>();
                close(product[c][r], mul_reference[c][r], scale, KERNEL_TOLERANCE)
            })
        });
        failures += check("mat4_mul", mul_ok);

        let mapped = mat4_mul_vec_with(level, &a, &v);
        let mul_vec_ok = (0..4).all(|r| {
            let scale = (0..4).map(|k| (a[k][r] * v[k]).abs()).sum::<f32>();
            close(mapped[r], mul_vec_reference[r], scale, KERNEL_TOLERANCE)
        });
        failures += check("mat4_mul_vec", mul_vec_ok);
    }

    failures
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };
    let active = config.apply();

    println!("simd compiled: {}", simd::SIMD_COMPILED);
    println!("host level:    {}", simd::host_level());
    println!("active level:  {active}");

    let failures = run_scenario() + check_levels();
    if failures == 0 {
        println!("all checks passed");
        ExitCode::SUCCESS
    } else {
        eprintln!("{failures} check(s) failed");
        ExitCode::FAILURE
    }
}
