pub mod contact;
pub mod message;
pub mod room;
pub mod scan;
