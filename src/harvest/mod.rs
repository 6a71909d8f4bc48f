pub mod backoff;
pub mod expansion;
