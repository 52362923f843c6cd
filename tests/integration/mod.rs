//! Integration tests grouped by area

mod api;
mod realtime;
mod storage;
