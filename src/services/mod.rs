pub mod archiver;
pub mod form_filler;
pub mod order_validator;
pub mod receipt_exporter;

pub use archiver::Archiver;
pub use form_filler::FormFiller;
pub use order_validator::OrderValidator;
pub use receipt_exporter::ReceiptExporter;
