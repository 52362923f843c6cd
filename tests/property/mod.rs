//! Property tests over the diary service

mod play_count_proptest;
