//! Integration tests exercising the full router over in-memory stores.

mod helpers;

mod activity_test;
mod competition_test;
mod friendship_test;
mod health_test;
