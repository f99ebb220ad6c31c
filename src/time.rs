use chrono::Local;

#[cfg(test)]
thread_local! {
    static MOCK_OFFSET: std::cell::Cell<u64> = const { std::cell::Cell::new(0) };
}

/// Current unix timestamp in seconds. Tests can shift it forward with
/// [`advance_mock_time`].
pub fn current_timestamp() -> u64 {
    let now = Local::now().timestamp() as u64;

    #[cfg(test)]
    let now = now + MOCK_OFFSET.with(|offset| offset.get());

    now
}

#[cfg(test)]
pub fn advance_mock_time(secs: u64) {
    MOCK_OFFSET.with(|offset| offset.set(offset.get() + secs));
}
