mod attachment;

pub use attachment::LoanAttachment;
