pub mod app;
pub mod feed_client;
pub mod feed_view;
pub mod session;
pub mod sync;
pub mod tonconnect;
