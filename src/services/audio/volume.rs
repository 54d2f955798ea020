use libpulse_binding::volume::{ChannelVolumes, Volume as PulseVolume};

/// Upper bound of the normalized volume scale
pub const NORMALIZED_MAX: u16 = 1000;

/// Raw PulseAudio volume of a silent channel (`PA_VOLUME_MUTED`)
pub const RAW_MUTED: u32 = PulseVolume::MUTED.0;

/// Raw PulseAudio volume of a channel at 100% (`PA_VOLUME_NORM`)
pub const RAW_NORM: u32 = PulseVolume::NORMAL.0;

/// Convert a raw PulseAudio volume to the 0..=1000 scale
///
/// Linear between `PA_VOLUME_MUTED` (0) and `PA_VOLUME_NORM` (1000).
/// Software amplification above 100% is clamped to 1000.
pub fn normalize_volume(raw: u32) -> u16 {
    if raw <= RAW_MUTED {
        return 0;
    }

    let scaled = u64::from(raw - RAW_MUTED) * u64::from(NORMALIZED_MAX)
        / u64::from(RAW_NORM - RAW_MUTED);

    u16::try_from(scaled.min(u64::from(NORMALIZED_MAX))).unwrap_or(NORMALIZED_MAX)
}

/// Normalized volume of an endpoint, collapsing mute to 0
pub fn endpoint_volume(raw: u32, muted: bool) -> u16 {
    if muted { 0 } else { normalize_volume(raw) }
}

/// Average raw volume over all channels
pub fn average_raw(volumes: &ChannelVolumes) -> u32 {
    volumes.avg().0
}
