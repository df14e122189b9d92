//! Text primary key generation.
//!
//! The process-wide generator can be replaced at configuration time. The
//! default produces 32-digit IDs: a 23-digit local timestamp down to the
//! nanosecond followed by 9 random digits from the OS CSPRNG, so IDs sort in
//! generation order.

use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use rand::RngCore;
use rand::rngs::OsRng;

use crate::error::{Error, Result};

/// A text ID generator.
pub type IdGenerator = dyn Fn() -> String + Send + Sync;

static GENERATOR: LazyLock<RwLock<Arc<IdGenerator>>> = LazyLock::new(|| {
    let generator: Arc<IdGenerator> = Arc::new(default_string_id);
    RwLock::new(generator)
});

/// Replace the process-wide generator.
pub fn set_id_generator<F>(generator: F)
where
    F: Fn() -> String + Send + Sync + 'static,
{
    let mut current = GENERATOR.write().unwrap_or_else(PoisonError::into_inner);
    *current = Arc::new(generator);
    tracing::debug!("Replaced string ID generator");
}

/// Restore the default generator.
pub fn reset_id_generator() {
    set_id_generator(default_string_id);
}

/// Generate an ID with the current generator.
///
/// An empty ID is an error; it usually means the random source failed.
pub fn generate_string_id() -> Result<String> {
    let generator = Arc::clone(&GENERATOR.read().unwrap_or_else(PoisonError::into_inner));
    let id = generator();
    if id.is_empty() {
        return Err(Error::mapping(
            "generate_string_id",
            "ID generator returned an empty string",
        ));
    }
    Ok(id)
}

/// The default generator. Returns an empty string if the OS random source
/// is unavailable.
pub fn default_string_id() -> String {
    let mut bytes = [0_u8; 8];
    if let Err(e) = OsRng.try_fill_bytes(&mut bytes) {
        tracing::warn!(error = %e, "OS random source unavailable, no ID generated");
        return String::new();
    }
    let suffix = u64::from_le_bytes(bytes) % 1_000_000_000;
    let timestamp = chrono::Local::now().format("%Y%m%d%H%M%S%9f");
    format!("{}{:09}", timestamp, suffix)
}
