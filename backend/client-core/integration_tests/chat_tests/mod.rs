mod connection;
mod helpers;
mod log_capture;
mod runtime;
