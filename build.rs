use std::cmp::Ordering;
use std::env;

// SIMD backends this crate can compile kernels for
#[derive(PartialEq, Eq, Debug)]
struct SimdBackend {
    name: &'static str,
    target_arches: &'static [&'static str],
    // target feature that must be enabled at compile time, if any
    required_feature: Option<&'static str>,
    cfg_flag: &'static str,
}

impl SimdBackend {
    // Lowest number == Highest Priority
    fn priority(&self) -> usize {
        match self.name {
            "x86" => 0,
            "neon" => 1,
            _ => usize::MAX,
        }
    }

    fn backends() -> Vec<SimdBackend> {
        vec![
            // SSE2/AVX kernels are gated at runtime by CPUID, so the target
            // only has to be x86.
            SimdBackend {
                name: "x86",
                target_arches: &["x86", "x86_64"],
                required_feature: None,
                cfg_flag: "simd_x86",
            },
            // NEON intrinsics are only stable on aarch64.
            SimdBackend {
                name: "neon",
                target_arches: &["aarch64"],
                required_feature: Some("neon"),
                cfg_flag: "simd_neon",
            },
        ]
    }

    fn matches(&self, target: &TargetInfo) -> bool {
        self.target_arches.contains(&target.arch.as_str())
            && self
                .required_feature
                .map_or(true, |feature| target.features.iter().any(|f| f == feature))
    }
}

impl Ord for SimdBackend {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority().cmp(&other.priority())
    }
}

impl PartialOrd for SimdBackend {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// What cargo tells us about the target we are compiling for
struct TargetInfo {
    arch: String,
    features: Vec<String>,
}

impl TargetInfo {
    fn from_env() -> Self {
        let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
        let features = env::var("CARGO_CFG_TARGET_FEATURE")
            .unwrap_or_default()
            .split(',')
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();

        Self { arch, features }
    }
}

// SIMD can be disabled either through the cargo feature or, for builds that
// cannot pass features (e.g. vendored), through the environment.
fn simd_forced_off() -> bool {
    if env::var_os("CARGO_FEATURE_FORCE_SCALAR").is_some() {
        return true;
    }

    matches!(
        env::var("LINMATH_FORCE_NO_SIMD").as_deref(),
        Ok("1") | Ok("true") | Ok("yes") | Ok("on")
    )
}

fn apply(backends: &mut [SimdBackend], target: &TargetInfo, forced_off: bool) {
    backends.sort();

    // Highest priority backend matching the target wins; if none matches
    // (or SIMD is forced off) only the scalar kernels are compiled.
    let cfg_flag = if forced_off {
        "simd_fallback"
    } else {
        backends
            .iter()
            .find(|backend| backend.matches(target))
            .map(|backend| backend.cfg_flag)
            .unwrap_or("simd_fallback")
    };

    println!("cargo:rustc-cfg={cfg_flag}");

    println!("cargo::rustc-check-cfg=cfg(simd_x86)");
    println!("cargo::rustc-check-cfg=cfg(simd_neon)");
    println!("cargo::rustc-check-cfg=cfg(simd_fallback)");
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=LINMATH_FORCE_NO_SIMD");

    let target = TargetInfo::from_env();
    let mut backends = SimdBackend::backends();

    apply(&mut backends, &target, simd_forced_off());
}
