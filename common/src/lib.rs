pub mod address;
pub mod chat;
pub mod feed;
pub mod manifest;
pub mod payload;
pub mod wallet;
