pub mod characters;
pub mod draw;
pub mod responses;
pub mod ritual;
pub mod serve;

use destiny_core::fortune::StdSource;

/// A seeded source when `seed` is given, otherwise one from OS entropy.
pub(crate) fn random_source(seed: Option<u64>) -> StdSource {
    match seed {
        Some(seed) => StdSource::seeded(seed),
        None => StdSource::from_entropy(),
    }
}
