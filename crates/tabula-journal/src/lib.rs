//! Tabula Journal - Persistence and ledger export
//!
//! This crate builds on `tabula-core`'s archived game form to provide:
//!
//! - **Store**: save and load whole games as RON or bincode, in memory or on disk
//! - **Exporter**: export the action ledger as RON, CSV or text
//!
//! # Example
//!
//! ```rust
//! use tabula_core::Game;
//! use tabula_journal::{load, save, Exporter, StoreConfig};
//!
//! let game = Game::new().add_character("Kolobok");
//! let config = StoreConfig::default();
//!
//! let bytes = save(&game, &config)?;
//! assert_eq!(load(&bytes, &config)?, game);
//!
//! let text = Exporter::new(&game).to_text();
//! assert!(text.contains("Kolobok"));
//! # Ok::<(), tabula_journal::Error>(())
//! ```

mod error;
mod exporter;
mod store;

pub use error::{Error, Result};
pub use exporter::{ExportFormat, Exporter, LedgerStats};
pub use store::{
    load, load_file_or_empty, load_from_file, load_or_empty, save, save_to_file, Format,
    StoreConfig,
};
