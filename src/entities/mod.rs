pub mod ledger_entry;
pub mod order_record;
pub mod vendor;
