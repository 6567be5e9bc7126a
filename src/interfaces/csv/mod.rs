pub mod checkout_reader;
pub mod payment_writer;
