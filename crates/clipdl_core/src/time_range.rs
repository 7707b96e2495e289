/// Which of the two range handles an edit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Start,
    End,
}

/// A `[start, end]` window in whole seconds over a fixed total duration.
///
/// Invariant: `0 <= start < end <= total`, so the selected span is always at
/// least one second. Every mutation preserves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    total: u32,
    start: u32,
    end: u32,
}

impl TimeRange {
    /// Full-length range over `total` seconds. `None` for a zero duration,
    /// which cannot hold a one-second span.
    pub fn new(total: u32) -> Option<Self> {
        (total > 0).then_some(Self {
            total,
            start: 0,
            end: total,
        })
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn value(&self, handle: Handle) -> u32 {
        match handle {
            Handle::Start => self.start,
            Handle::End => self.end,
        }
    }

    /// Length of the selection in seconds.
    pub fn span(&self) -> u32 {
        self.end - self.start
    }

    /// Position of a handle along the track, in percent.
    pub fn percent(&self, handle: Handle) -> f64 {
        f64::from(self.value(handle)) / f64::from(self.total) * 100.0
    }

    /// Moves a handle to the second nearest to `pointer_fraction` of the
    /// track width. Candidates that would cross the other handle are dropped.
    /// Returns whether the range changed.
    pub fn drag_update(&mut self, handle: Handle, pointer_fraction: f64) -> bool {
        if !pointer_fraction.is_finite() {
            return false;
        }
        let fraction = pointer_fraction.clamp(0.0, 1.0);
        let candidate = (fraction * f64::from(self.total)).round() as u32;

        let slot = match handle {
            Handle::Start if candidate < self.end => &mut self.start,
            Handle::End if candidate > self.start => &mut self.end,
            _ => return false,
        };
        let changed = *slot != candidate;
        *slot = candidate;
        changed
    }

    /// Applies a typed value. Unlike dragging, the value is always clamped
    /// into the valid window for the handle rather than rejected.
    pub fn entry_update(&mut self, handle: Handle, raw: &str) -> bool {
        let value = parse_entry(raw);
        let before = *self;
        match handle {
            Handle::Start => {
                self.start = clamp_i64(value, 0, self.end - 1);
            }
            Handle::End => {
                self.end = clamp_i64(value, self.start + 1, self.total);
            }
        }
        *self != before
    }

    pub fn is_full(&self) -> bool {
        self.start == 0 && self.end == self.total
    }

    /// Formatted start bound, only when it differs from the full-length default.
    pub fn clip_start(&self) -> Option<String> {
        (self.start > 0).then(|| format_clock(self.start))
    }

    /// Formatted end bound, only when it differs from the full-length default.
    pub fn clip_end(&self) -> Option<String> {
        (self.end < self.total).then(|| format_clock(self.end))
    }
}

/// `H:MM:SS` for an hour or more, otherwise `M:SS`.
pub fn format_clock(seconds: u32) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

/// Lenient integer parse: optional sign and leading digits, anything after is
/// ignored. Input without leading digits reads as 0.
fn parse_entry(raw: &str) -> i64 {
    let raw = raw.trim();
    let (negative, digits) = match raw.as_bytes().first() {
        Some(b'-') => (true, &raw[1..]),
        Some(b'+') => (false, &raw[1..]),
        _ => (false, raw),
    };
    let len = digits
        .bytes()
        .take_while(|byte| byte.is_ascii_digit())
        .count();
    // Overlong digit runs saturate; they get clamped to the track anyway.
    let magnitude = digits[..len].parse::<i64>().unwrap_or(if len > 0 {
        i64::MAX
    } else {
        0
    });
    if negative {
        -magnitude
    } else {
        magnitude
    }
}

fn clamp_i64(value: i64, min: u32, max: u32) -> u32 {
    value.clamp(i64::from(min), i64::from(max)) as u32
}
