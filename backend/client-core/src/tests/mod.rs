mod color;
mod config;
mod presenter;
mod session;
