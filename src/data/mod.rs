pub mod idx;

pub use idx::{load_idx_pair, load_mnist, parse_idx_pair, Dataset};
