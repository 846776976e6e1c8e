pub mod classification;
pub mod reply;
pub mod ticket;
