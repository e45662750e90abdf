mod config;
mod connection;
mod session;
