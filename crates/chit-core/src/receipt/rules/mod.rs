//! Rule-based extractors for receipt text.

pub mod amounts;
pub mod classify;
pub mod cleanup;
pub mod patterns;
pub mod store;
pub mod tax;

pub use amounts::{extract_subtotal, extract_tax, extract_total};
pub use classify::{classify, LineClass};
pub use cleanup::{clean_item_name, extract_quantity};
pub use store::detect_store;
pub use tax::derive_tax_multiplier;
