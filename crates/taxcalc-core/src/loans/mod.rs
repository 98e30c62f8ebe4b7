pub mod amortization;
pub mod emi;
pub mod prepayment;
pub mod sip_offset;
