pub mod directory;
pub mod normalize;
pub mod retry;

use crate::error::FetchError;
use crate::types::signals::SignalRecord;
use chrono::NaiveDate;

pub use directory::DirectorySource;
pub use retry::RetryingSource;

/// Supplies the raw signals for one domain. Implementations may block on I/O;
/// scoring never calls back into the source.
pub trait SignalSource {
    fn fetch(&self, domain: &str, today: NaiveDate) -> Result<SignalRecord, FetchError>;
}

#[cfg(test)]
pub(crate) use memory::MemorySource;
