pub mod compact;
pub mod fee_rate;
pub mod time;
