pub mod csv_loader;

pub use csv_loader::{download_orders_csv, load_orders, read_orders_from_csv};
