use super::{ApplyOutcome, Clause};
use crate::request::FetchRequest;
use std::fmt;

type TweakFn = dyn Fn(&mut FetchRequest) + Send + Sync;

/// An arbitrary adjustment to a request, for settings no other clause covers.
pub struct Tweak(Box<TweakFn>);

impl Tweak {
    pub fn new(f: impl Fn(&mut FetchRequest) + Send + Sync + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn limit(limit: usize) -> Self {
        Self::new(move |r| r.fetch_limit = Some(limit))
    }

    pub fn offset(offset: usize) -> Self {
        Self::new(move |r| r.fetch_offset = offset)
    }
}

impl fmt::Debug for Tweak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Tweak(..)")
    }
}

impl Clause for Tweak {
    fn apply_to(&self, request: &mut FetchRequest) -> ApplyOutcome {
        (self.0)(request);
        ApplyOutcome::Applied
    }
}
