//! Tabula Dice - Dice formulas for tabula
//!
//! Parses dice notation and records each throw as a creation
//! [`Action`](tabula_core::Action) the game ledger can commit:
//! - `lexer` - text to `Token`s (`2d6`, `+`, `12`, with `d`/`к`/`д` dividers)
//! - `DiceThrow` - one die or constant
//! - `Formula` - a named formula thrown into a list of actions
//! - `Roll` / `Attack` - formulas thrown for a purpose
//!
//! Throws draw from a seeded `GameRng`, so a seed replays the same results.

mod error;
mod formula;
pub mod lexer;
mod rng;
mod roll;
mod throw;

pub use error::{Error, Result};
pub use formula::{total, Formula};
pub use lexer::{tokenize, Sign, Token};
pub use rng::GameRng;
pub use roll::{Attack, Roll};
pub use throw::DiceThrow;
