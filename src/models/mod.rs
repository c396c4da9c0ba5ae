pub mod loaders;
pub mod order;

pub use loaders::{download_orders_csv, load_orders, read_orders_from_csv};
pub use order::{OrderRow, Receipt};
