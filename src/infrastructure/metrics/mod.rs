mod counters;

pub(crate) use counters::increment_samples_written;
