//! Fuzz target: `TimeOfDay::from_str` and `SecurityWindow::parse`
//!
//! Invariants checked:
//! - No panics under any input string
//! - A parsed time is in range and survives a display round trip
//!
//! cargo fuzz run fuzz_time_of_day

#![no_main]

use libfuzzer_sys::fuzz_target;
use verdant::scheduler::{SecurityWindow, TimeOfDay};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };

    if let Ok(t) = text.parse::<TimeOfDay>() {
        assert!(t.hour() < 24 && t.minute() < 60);
        assert_eq!(t.to_string().parse::<TimeOfDay>(), Ok(t));
    }

    if let Some((start, end)) = text.split_once(' ') {
        if let Ok(w) = SecurityWindow::parse(start, end) {
            assert!(w.contains(w.start));
        }
    }
});
