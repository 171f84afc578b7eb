use rand::RngExt;

/// Smallest six-digit code.
pub const CODE_MIN: u32 = 100_000;
/// Largest six-digit code.
pub const CODE_MAX: u32 = 999_999;

/// Uniform candidate in `CODE_MIN..=CODE_MAX`. Uniqueness is the caller's problem.
pub fn generate_candidate() -> String {
    rand::rng().random_range(CODE_MIN..=CODE_MAX).to_string()
}
