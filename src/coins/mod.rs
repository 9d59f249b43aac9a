mod load;
mod parse;
mod record;

pub use load::load_coins;
pub use record::{Coin, SortKey};
