// Order records and the settlement preview
pub mod orders;

// Vendor directory
pub mod vendors;

// Per-date ledgers and commission payouts
pub mod commission;
pub mod ledger;
