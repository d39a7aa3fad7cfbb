use crate::{components::TimeZone, TemporalJsonError, TemporalJsonResult};

/// Returns the host system's zone identifier as a named `TimeZone`.
///
/// This implementation is backed by [`iana_time_zone`].
#[inline]
pub(crate) fn get_system_timezone() -> TemporalJsonResult<TimeZone> {
    iana_time_zone::get_timezone()
        .map(TimeZone::Named)
        .map_err(|e| {
            #[cfg(feature = "log")]
            log::error!("unable to read the system time zone: {e}");
            TemporalJsonError::parse()
                .with_message("Error fetching the system time zone")
                .with_input(e.to_string())
        })
}
