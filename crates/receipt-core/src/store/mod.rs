//! Receipt storage interface.

mod memory;

pub use memory::MemoryReceiptDatabase;

use crate::error::StoreError;
use crate::models::receipt::Receipt;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Thread-safe access to a database of receipts.
pub trait ReceiptDatabase: Send + Sync {
    /// Retrieve a receipt by its ID.
    fn get_receipt(&self, id: i64) -> Result<Receipt>;

    /// Save a receipt, assigning it a new ID. The receipt's own `id` is ignored.
    fn add_receipt(&self, receipt: &Receipt) -> Result<i64>;

    /// Remove a receipt by its ID.
    fn delete_receipt(&self, id: i64) -> Result<()>;

    /// Replace the stored entry with the same ID.
    fn update_receipt(&self, receipt: &Receipt) -> Result<()>;

    /// List a user's receipts ordered by date, undated receipts last.
    fn list_receipts_by_user(&self, user_id: &str) -> Result<Vec<Receipt>>;

    /// Close the database. Later calls fail with [`StoreError::Closed`].
    fn close(&self) -> Result<()>;
}
